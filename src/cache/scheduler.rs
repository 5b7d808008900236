//! Expiry Scheduler Module
//!
//! Time-ordered queue of expiry records with a consumer that sleeps until the
//! earliest deadline instead of sweeping the key space.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::Instant;

use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

use crate::cache::ExpiryRecord;

// == Expiry Scheduler ==
/// Min-ordered queue of [`ExpiryRecord`]s.
///
/// Any number of threads may schedule; a single consumer drains the queue via
/// [`ExpiryScheduler::take_expired`]. The queue lock is never held across an
/// await point.
#[derive(Debug)]
pub struct ExpiryScheduler<K> {
    /// Pending records, earliest deadline at the top
    queue: Mutex<BinaryHeap<Reverse<ExpiryRecord<K>>>>,
    /// Wakes the consumer when the head of the queue changes
    notify: Notify,
    /// Cancelled when the scheduler is closed
    shutdown: CancellationToken,
}

impl<K> ExpiryScheduler<K> {
    // == Constructor ==
    /// Creates an empty, open scheduler.
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(BinaryHeap::new()),
            notify: Notify::new(),
            shutdown: CancellationToken::new(),
        }
    }

    // == Schedule ==
    /// Queues `key` (written with `stamp`) for removal at `deadline`.
    ///
    /// The consumer is only woken when the new record becomes the earliest
    /// deadline. Does nothing once the scheduler is closed.
    pub fn schedule(&self, key: K, stamp: u64, deadline: Instant) {
        let wake = {
            let mut queue = self.queue.lock();
            // Checked under the lock so a concurrent close cannot miss the push
            if self.shutdown.is_cancelled() {
                return;
            }
            let becomes_head = queue
                .peek()
                .map_or(true, |Reverse(head)| deadline < head.deadline);
            queue.push(Reverse(ExpiryRecord::new(key, stamp, deadline)));
            becomes_head
        };

        if wake {
            self.notify.notify_one();
        }
    }

    // == Take Expired ==
    /// Waits until the earliest record is due, then removes and returns it.
    ///
    /// Waits for a schedule when the queue is empty. Returns `None` once the
    /// scheduler has been closed.
    pub async fn take_expired(&self) -> Option<ExpiryRecord<K>> {
        loop {
            if self.shutdown.is_cancelled() {
                return None;
            }

            let next_deadline = {
                let mut queue = self.queue.lock();
                let now = Instant::now();
                let head = queue
                    .peek()
                    .map(|Reverse(record)| (record.deadline, record.is_due(now)));
                match head {
                    Some((_, true)) => return queue.pop().map(|Reverse(record)| record),
                    Some((deadline, false)) => Some(deadline),
                    None => None,
                }
            };

            match next_deadline {
                Some(deadline) => {
                    let sleep = tokio::time::sleep_until(tokio::time::Instant::from_std(deadline));
                    tokio::select! {
                        _ = self.shutdown.cancelled() => return None,
                        _ = self.notify.notified() => {}
                        _ = sleep => {}
                    }
                }
                None => {
                    tokio::select! {
                        _ = self.shutdown.cancelled() => return None,
                        _ = self.notify.notified() => {}
                    }
                }
            }
        }
    }

    // == Close ==
    /// Closes the scheduler, waking any consumer blocked in `take_expired`.
    ///
    /// Pending records are dropped; nothing will ever consume them.
    pub fn close(&self) {
        self.shutdown.cancel();
        self.queue.lock().clear();
    }

    /// Returns true once [`ExpiryScheduler::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    /// Number of records still waiting to fire.
    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }
}

impl<K> Default for ExpiryScheduler<K> {
    fn default() -> Self {
        Self::new()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_take_returns_due_record_immediately() {
        let scheduler = ExpiryScheduler::new();
        scheduler.schedule("key1", 1, Instant::now());

        let record = scheduler.take_expired().await.unwrap();
        assert_eq!(record.key, "key1");
        assert_eq!(record.stamp, 1);
        assert!(scheduler.is_empty());
    }

    #[tokio::test]
    async fn test_take_waits_for_deadline() {
        let scheduler = ExpiryScheduler::new();
        let start = Instant::now();
        scheduler.schedule("key1", 1, start + Duration::from_millis(50));

        let record = scheduler.take_expired().await.unwrap();

        assert_eq!(record.key, "key1");
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_records_taken_in_deadline_order() {
        let scheduler = ExpiryScheduler::new();
        let now = Instant::now();
        scheduler.schedule("late", 1, now + Duration::from_millis(30));
        scheduler.schedule("early", 2, now);
        scheduler.schedule("middle", 3, now + Duration::from_millis(10));

        let mut keys = Vec::new();
        for _ in 0..3 {
            keys.push(scheduler.take_expired().await.unwrap().key);
        }
        assert_eq!(keys, vec!["early", "middle", "late"]);
    }

    #[tokio::test]
    async fn test_earlier_schedule_wakes_waiting_consumer() {
        let scheduler = Arc::new(ExpiryScheduler::new());
        scheduler.schedule("far", 1, Instant::now() + Duration::from_secs(60));

        let consumer = {
            let scheduler = Arc::clone(&scheduler);
            tokio::spawn(async move { scheduler.take_expired().await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        scheduler.schedule("near", 2, Instant::now() + Duration::from_millis(10));

        let record = tokio::time::timeout(Duration::from_secs(2), consumer)
            .await
            .expect("consumer should wake for the earlier deadline")
            .unwrap()
            .unwrap();
        assert_eq!(record.key, "near");
        assert_eq!(scheduler.len(), 1);
    }

    #[tokio::test]
    async fn test_schedule_wakes_consumer_on_empty_queue() {
        let scheduler = Arc::new(ExpiryScheduler::new());

        let consumer = {
            let scheduler = Arc::clone(&scheduler);
            tokio::spawn(async move { scheduler.take_expired().await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        scheduler.schedule(5u32, 1, Instant::now());

        let record = tokio::time::timeout(Duration::from_secs(2), consumer)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        assert_eq!(record.key, 5);
    }

    #[tokio::test]
    async fn test_close_unblocks_consumer() {
        let scheduler: Arc<ExpiryScheduler<String>> = Arc::new(ExpiryScheduler::new());

        let consumer = {
            let scheduler = Arc::clone(&scheduler);
            tokio::spawn(async move { scheduler.take_expired().await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        scheduler.close();

        let result = tokio::time::timeout(Duration::from_secs(2), consumer)
            .await
            .expect("close should unblock the consumer")
            .unwrap();
        assert!(result.is_none());
        assert!(scheduler.is_closed());
    }

    #[test]
    fn test_close_drops_pending_records() {
        let scheduler = ExpiryScheduler::new();
        let later = Instant::now() + Duration::from_secs(60);
        scheduler.schedule("key1", 1, later);
        scheduler.schedule("key2", 2, later);
        assert_eq!(scheduler.len(), 2);

        scheduler.close();

        assert!(scheduler.is_empty());
        assert!(tokio_test::block_on(scheduler.take_expired()).is_none());
    }

    #[test]
    fn test_schedule_after_close_is_ignored() {
        let scheduler = ExpiryScheduler::new();
        scheduler.close();
        scheduler.schedule("key1", 1, Instant::now());

        assert!(scheduler.is_empty());
        assert!(tokio_test::block_on(scheduler.take_expired()).is_none());
    }
}
