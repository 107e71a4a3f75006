//! One-shot calorie summaries and goal checks.

use log::{debug, info, warn};
use std::fmt;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::models::activity::FitnessActivity;

/// Output shared by every summary job. Each job holds the lock for its whole
/// printed block, so lines from concurrent jobs never interleave.
pub type SharedOutput = Arc<Mutex<Box<dyn Write + Send>>>;

pub fn shared_output<W: Write + Send + 'static>(writer: W) -> SharedOutput {
    Arc::new(Mutex::new(Box::new(writer)))
}

/// A target that a measured value either reaches or does not.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Goal<T> {
    target: T,
}

impl<T: PartialOrd> Goal<T> {
    pub fn new(target: T) -> Self {
        Self { target }
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn is_met(&self, value: T) -> bool {
        value >= self.target
    }
}

#[derive(Debug)]
pub enum SummaryError {
    Cancelled,
    Output(std::io::Error),
}

impl fmt::Display for SummaryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummaryError::Cancelled => write!(f, "Summary cancelled"),
            SummaryError::Output(err) => write!(f, "Could not write summary: {}", err),
        }
    }
}

impl std::error::Error for SummaryError {}

impl From<std::io::Error> for SummaryError {
    fn from(err: std::io::Error) -> Self {
        SummaryError::Output(err)
    }
}

pub fn total_calories(activities: &[FitnessActivity]) -> f64 {
    activities.iter().map(FitnessActivity::calories).sum()
}

/// Spawns a job that announces the batch, waits `delay`, then prints the
/// calorie total. Cancelling during the wait ends the job without a total.
pub fn spawn_summary(
    activities: Vec<FitnessActivity>,
    out: SharedOutput,
    delay: Duration,
    cancel: CancellationToken,
) -> JoinHandle<Result<f64, SummaryError>> {
    tokio::spawn(async move {
        let mut out = out.lock().await;
        writeln!(out, "[Thread]: Processing analytics for {} activities...", activities.len())?;
        out.flush()?;

        tokio::select! {
            _ = cancel.cancelled() => {
                warn!("Calorie summary for {} activities cancelled", activities.len());
                return Err(SummaryError::Cancelled);
            }
            _ = tokio::time::sleep(delay) => {}
        }

        let total = total_calories(&activities);
        writeln!(out, "[Thread]: Total Calories Burned: {:?}", total)?;
        out.flush()?;
        info!("Calorie summary: {} activities, {:?} kcal", activities.len(), total);
        Ok::<f64, SummaryError>(total)
    })
}

/// Waits for a summary job and logs how it ended. Returns the total when the
/// job printed one.
pub async fn report_summary(handle: JoinHandle<Result<f64, SummaryError>>) -> Option<f64> {
    match handle.await {
        Ok(Ok(total)) => Some(total),
        Ok(Err(SummaryError::Cancelled)) => {
            debug!("Calorie summary ended before printing a total");
            None
        }
        Ok(Err(err)) => {
            warn!("{}", err);
            None
        }
        Err(err) => {
            warn!("Calorie summary task failed: {}", err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::activity::NewActivity;
    use chrono::NaiveDate;

    #[derive(Clone, Default)]
    struct Sink(Arc<std::sync::Mutex<Vec<u8>>>);

    impl Write for Sink {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Sink {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn sample() -> Vec<FitnessActivity> {
        let day = NaiveDate::from_ymd_opt(2025, 12, 1).unwrap();
        vec![
            NewActivity::running(101, 30, 5.0, day).into_activity(1),
            NewActivity::cycling(101, 60, 20.0, day).into_activity(2),
        ]
    }

    #[test]
    fn goal_is_met_at_or_above_target() {
        let goal = Goal::new(500.0);
        assert!(goal.is_met(1100.0));
        assert!(goal.is_met(500.0));
        assert!(!goal.is_met(499.9));
        assert!(Goal::new(10_000).is_met(12_000));
    }

    #[test]
    fn totals_every_activity() {
        assert_eq!(total_calories(&sample()), 1100.0);
        assert_eq!(total_calories(&[]), 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn summary_prints_count_then_total() {
        let sink = Sink::default();
        let handle = spawn_summary(
            sample(),
            shared_output(sink.clone()),
            Duration::from_millis(500),
            CancellationToken::new(),
        );

        assert_eq!(handle.await.unwrap().unwrap(), 1100.0);
        assert_eq!(
            sink.text(),
            "[Thread]: Processing analytics for 2 activities...\n[Thread]: Total Calories Burned: 1100.0\n"
        );
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn total_keeps_full_precision() {
        let day = NaiveDate::from_ymd_opt(2025, 12, 1).unwrap();
        let activity = NewActivity::running(101, 10, 1.2345, day).into_activity(1);
        let sink = Sink::default();
        let handle = spawn_summary(
            vec![activity],
            shared_output(sink.clone()),
            Duration::from_millis(500),
            CancellationToken::new(),
        );

        let total = report_summary(handle).await.unwrap();
        assert_eq!(total, 1.2345 * 60.0);
        assert!(sink.text().ends_with(&format!("Total Calories Burned: {:?}\n", 1.2345 * 60.0)));
    }

    #[tokio::test(start_paused = true)]
    async fn report_summary_swallows_write_failures() {
        let handle = spawn_summary(sample(), shared_output(Broken), Duration::from_millis(500), CancellationToken::new());
        assert_eq!(report_summary(handle).await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn report_summary_returns_the_printed_total() {
        let handle = spawn_summary(
            sample(),
            shared_output(Sink::default()),
            Duration::from_millis(500),
            CancellationToken::new(),
        );
        assert_eq!(report_summary(handle).await, Some(1100.0));
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_summaries_do_not_interleave() {
        let sink = Sink::default();
        let out = shared_output(sink.clone());
        let activities = sample();

        let first = spawn_summary(activities[..1].to_vec(), out.clone(), Duration::from_millis(500), CancellationToken::new());
        let second = spawn_summary(activities[1..].to_vec(), out, Duration::from_millis(500), CancellationToken::new());
        first.await.unwrap().unwrap();
        second.await.unwrap().unwrap();

        let text = sink.text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        for block in lines.chunks(2) {
            assert!(block[0].starts_with("[Thread]: Processing analytics for 1 activities"));
            assert!(block[1].starts_with("[Thread]: Total Calories Burned:"));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_summary_prints_no_total() {
        let sink = Sink::default();
        let cancel = CancellationToken::new();
        let handle = spawn_summary(sample(), shared_output(sink.clone()), Duration::from_secs(60), cancel.clone());

        tokio::task::yield_now().await;
        cancel.cancel();

        assert!(matches!(handle.await.unwrap(), Err(SummaryError::Cancelled)));
        assert!(!sink.text().contains("Total Calories Burned"));
    }
}
