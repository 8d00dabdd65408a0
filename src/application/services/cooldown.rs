//! Per-command, per-user cooldown buckets

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::domain::entities::Cooldown;

/// Recent uses of one (command, user) pair and the window they count in
struct Bucket {
    per: Duration,
    uses: Vec<Instant>,
}

impl Bucket {
    fn expire(&mut self, now: Instant) {
        let per = self.per;
        self.uses.retain(|&t| now.duration_since(t) < per);
    }
}

/// Sliding-window usage tracker keyed by (command, user).
///
/// Buckets whose uses have all left their window are dropped on the next
/// hit, so the map only holds callers that are still cooling down.
#[derive(Default)]
pub struct CooldownTracker {
    buckets: Mutex<HashMap<(String, String), Bucket>>,
}

impl CooldownTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a use, or return how long until the next one is allowed.
    pub fn hit(&self, command: &str, user_id: &str, cooldown: &Cooldown) -> Result<(), Duration> {
        self.hit_at(command, user_id, cooldown, Instant::now())
    }

    pub fn hit_at(
        &self,
        command: &str,
        user_id: &str,
        cooldown: &Cooldown,
        now: Instant,
    ) -> Result<(), Duration> {
        // A poisoned lock only means another dispatch panicked mid-update
        let mut buckets = self.buckets.lock().unwrap_or_else(|e| e.into_inner());

        buckets.retain(|_, bucket| {
            bucket.expire(now);
            !bucket.uses.is_empty()
        });

        let bucket = buckets
            .entry((command.to_string(), user_id.to_string()))
            .or_insert_with(|| Bucket {
                per: cooldown.per,
                uses: Vec::new(),
            });
        bucket.per = cooldown.per;

        if bucket.uses.len() >= cooldown.rate as usize {
            let retry_after = bucket
                .uses
                .first()
                .map(|t| cooldown.per.saturating_sub(now.duration_since(*t)))
                .unwrap_or(cooldown.per);
            return Err(retry_after);
        }

        bucket.uses.push(now);
        Ok(())
    }

    /// Number of (command, user) pairs currently tracked
    pub fn bucket_count(&self) -> usize {
        self.buckets.lock().map(|b| b.len()).unwrap_or_else(|e| e.into_inner().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_use_inside_window_is_rejected() {
        let tracker = CooldownTracker::new();
        let cooldown = Cooldown::new(1, Duration::from_secs(10));
        let start = Instant::now();

        assert!(tracker.hit_at("ban", "1", &cooldown, start).is_ok());
        let retry = tracker
            .hit_at("ban", "1", &cooldown, start + Duration::from_secs(4))
            .unwrap_err();
        assert_eq!(retry, Duration::from_secs(6));
    }

    #[test]
    fn test_window_expires() {
        let tracker = CooldownTracker::new();
        let cooldown = Cooldown::new(1, Duration::from_secs(10));
        let start = Instant::now();

        tracker.hit_at("ban", "1", &cooldown, start).unwrap();
        assert!(tracker
            .hit_at("ban", "1", &cooldown, start + Duration::from_secs(10))
            .is_ok());
    }

    #[test]
    fn test_buckets_are_per_user_and_command() {
        let tracker = CooldownTracker::new();
        let cooldown = Cooldown::new(1, Duration::from_secs(10));
        let now = Instant::now();

        tracker.hit_at("ban", "1", &cooldown, now).unwrap();
        assert!(tracker.hit_at("ban", "2", &cooldown, now).is_ok());
        assert!(tracker.hit_at("kick", "1", &cooldown, now).is_ok());
    }

    #[test]
    fn test_rate_allows_several_uses() {
        let tracker = CooldownTracker::new();
        let cooldown = Cooldown::new(2, Duration::from_secs(10));
        let now = Instant::now();

        tracker.hit_at("8ball", "1", &cooldown, now).unwrap();
        tracker.hit_at("8ball", "1", &cooldown, now).unwrap();
        assert!(tracker.hit_at("8ball", "1", &cooldown, now).is_err());
    }

    #[test]
    fn test_expired_buckets_are_dropped() {
        let tracker = CooldownTracker::new();
        let cooldown = Cooldown::new(1, Duration::from_secs(5));
        let start = Instant::now();

        for user in 0..1000 {
            tracker.hit_at("ban", &user.to_string(), &cooldown, start).unwrap();
        }
        assert_eq!(tracker.bucket_count(), 1000);

        let later = start + Duration::from_secs(3600);
        tracker.hit_at("ban", "late", &cooldown, later).unwrap();
        assert_eq!(tracker.bucket_count(), 1);
    }

    #[test]
    fn test_live_buckets_survive_sweep() {
        let tracker = CooldownTracker::new();
        let short = Cooldown::new(1, Duration::from_secs(5));
        let long = Cooldown::new(1, Duration::from_secs(60));
        let start = Instant::now();

        tracker.hit_at("ban", "1", &short, start).unwrap();
        tracker.hit_at("8ball", "1", &long, start).unwrap();

        let later = start + Duration::from_secs(10);
        tracker.hit_at("kick", "2", &short, later).unwrap();
        assert_eq!(tracker.bucket_count(), 2);
        assert!(tracker.hit_at("8ball", "1", &long, later).is_err());
    }
}
