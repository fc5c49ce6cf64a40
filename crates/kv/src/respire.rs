/// Periodically hands control back to the tokio scheduler during long
/// decode loops.
#[derive(Debug)]
pub(crate) struct Respirator {
    every: Option<usize>,
    count: usize,
}

impl Respirator {
    /// Yield every `every` items. `None` or zero never yields.
    pub(crate) const fn new(every: Option<usize>) -> Self {
        let every = match every {
            Some(0) => None,
            other => other,
        };
        Self { every, count: 0 }
    }

    /// Record one processed item, yielding if the interval is reached.
    pub(crate) async fn breathe(&mut self) {
        let Some(every) = self.every else { return };
        self.count += 1;
        if self.count % every == 0 {
            tokio::task::yield_now().await;
        }
    }

    /// Items recorded so far.
    #[cfg(test)]
    pub(crate) const fn count(&self) -> usize {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    };

    #[tokio::test]
    async fn counts_items() {
        let mut r = Respirator::new(Some(2));
        for _ in 0..5 {
            r.breathe().await;
        }
        assert_eq!(r.count(), 5);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn yields_to_other_tasks_at_interval() {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&ran);
        tokio::spawn(async move { flag.store(true, Ordering::SeqCst) });

        let mut r = Respirator::new(Some(3));
        r.breathe().await;
        r.breathe().await;
        assert!(!ran.load(Ordering::SeqCst));
        r.breathe().await;
        assert!(ran.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn disabled_never_counts() {
        let mut r = Respirator::new(Some(0));
        r.breathe().await;
        assert_eq!(r.count(), 0);
        let mut r = Respirator::new(None);
        r.breathe().await;
        assert_eq!(r.count(), 0);
    }
}
