use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use log::debug;

use crate::bot::{BotStrategy, Difficulty};
use crate::game::GameId;
use crate::piece::Color;

pub type SharedBot = Arc<Mutex<Box<dyn BotStrategy + Send>>>;

type BotKey = (GameId, Color, Difficulty);

struct Entry {
    bot: SharedBot,
    last_access: Instant,
}

struct Entries {
    bots: HashMap<BotKey, Entry>,
    last_sweep: Instant,
}
impl Entries {
    fn sweep(&mut self, now: Instant, ttl: Duration) -> usize {
        let before = self.bots.len();
        self.bots
            .retain(|_, e| now.duration_since(e.last_access) <= ttl);
        self.last_sweep = now;
        before - self.bots.len()
    }

    fn drop_least_recent(&mut self) {
        let oldest = self
            .bots
            .iter()
            .min_by_key(|(_, e)| e.last_access)
            .map(|(key, _)| *key);
        if let Some(key) = oldest {
            debug!("game {}: cache full, dropping its {} bot", key.0, key.2);
            self.bots.remove(&key);
        }
    }
}

/// Live bot instances, one per game, seat and difficulty, so that their history
/// and table survive between turns.
/// Lookups sweep out bots idle for longer than the ttl, and the least recently
/// used bot makes room once `max_entries` are alive
pub struct BotCache {
    entries: Mutex<Entries>,
    ttl: Duration,
    max_entries: usize,
}
impl BotCache {
    pub const DEFAULT_TTL: Duration = Duration::from_secs(30 * 60);
    pub const DEFAULT_MAX_ENTRIES: usize = 600;
    const MAX_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

    pub fn new(ttl: Duration) -> Self {
        Self::with_capacity(ttl, Self::DEFAULT_MAX_ENTRIES)
    }

    pub fn with_capacity(ttl: Duration, max_entries: usize) -> Self {
        BotCache {
            entries: Mutex::new(Entries {
                bots: HashMap::new(),
                last_sweep: Instant::now(),
            }),
            ttl,
            max_entries: max_entries.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The bot playing `color` at `difficulty` in `game_id`. Searching through it
    /// only locks the bot itself, the cache stays available to other games
    pub fn get_or_create(&self, game_id: GameId, color: Color, difficulty: Difficulty) -> SharedBot {
        let now = Instant::now();
        let mut entries = self.lock();
        if now.duration_since(entries.last_sweep) >= self.ttl.min(Self::MAX_SWEEP_INTERVAL) {
            let evicted = entries.sweep(now, self.ttl);
            if evicted > 0 {
                debug!("evicted {} idle bots", evicted);
            }
        }

        let key = (game_id, color, difficulty);
        if !entries.bots.contains_key(&key) && entries.bots.len() >= self.max_entries {
            entries.drop_least_recent();
        }
        let ttl = self.ttl;
        let entry = entries.bots.entry(key).or_insert_with(|| {
            debug!("game {}: new {} bot for {}", game_id, difficulty, color);
            Entry {
                bot: Arc::new(Mutex::new(difficulty.create_bot())),
                last_access: now,
            }
        });
        if now.duration_since(entry.last_access) > ttl {
            debug!("game {}: {} bot for {} expired, starting over", game_id, difficulty, color);
            entry.bot = Arc::new(Mutex::new(difficulty.create_bot()));
        }
        entry.last_access = now;
        Arc::clone(&entry.bot)
    }

    /// Drops every bot idle for longer than the ttl, returns how many went away
    pub fn evict_expired(&self) -> usize {
        let evicted = self.lock().sweep(Instant::now(), self.ttl);
        if evicted > 0 {
            debug!("evicted {} idle bots", evicted);
        }
        evicted
    }

    pub fn remove_game(&self, game_id: GameId) {
        self.lock().bots.retain(|(id, _, _), _| *id != game_id);
    }

    pub fn len(&self) -> usize {
        self.lock().bots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
impl Default for BotCache {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::Color::{Red, White};
    use std::thread;

    #[test]
    fn same_seat_gets_the_same_bot() {
        let cache = BotCache::default();
        let a = cache.get_or_create(1, Red, Difficulty::Hard);
        let b = cache.get_or_create(1, Red, Difficulty::Hard);
        assert!(Arc::ptr_eq(&a, &b));

        let other_game = cache.get_or_create(2, Red, Difficulty::Hard);
        let other_level = cache.get_or_create(1, Red, Difficulty::Easy);
        assert!(!Arc::ptr_eq(&a, &other_game));
        assert_eq!(other_level.lock().unwrap().difficulty(), Difficulty::Easy);
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn both_seats_of_a_game_get_their_own_bot() {
        let cache = BotCache::default();
        let red = cache.get_or_create(1, Red, Difficulty::Medium);
        let white = cache.get_or_create(1, White, Difficulty::Medium);
        assert!(!Arc::ptr_eq(&red, &white));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn idle_bots_expire() {
        let cache = BotCache::new(Duration::from_millis(20));
        let first = cache.get_or_create(1, Red, Difficulty::Medium);
        thread::sleep(Duration::from_millis(40));

        // Touching an expired entry replaces its bot
        let second = cache.get_or_create(1, Red, Difficulty::Medium);
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn lookups_sweep_out_idle_bots() {
        let cache = BotCache::with_capacity(Duration::from_millis(1), 2000);
        for game_id in 0..1000 {
            cache.get_or_create(game_id, White, Difficulty::Hard);
        }
        thread::sleep(Duration::from_millis(20));
        cache.get_or_create(5000, White, Difficulty::Hard);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn manual_eviction() {
        let cache = BotCache::new(Duration::from_millis(20));
        cache.get_or_create(1, Red, Difficulty::Easy);
        cache.get_or_create(2, Red, Difficulty::Easy);
        thread::sleep(Duration::from_millis(40));
        assert_eq!(cache.evict_expired(), 2);
        assert!(cache.is_empty());
        assert_eq!(cache.evict_expired(), 0);
    }

    #[test]
    fn full_cache_drops_the_least_recently_used() {
        let cache = BotCache::with_capacity(BotCache::DEFAULT_TTL, 2);
        let first = cache.get_or_create(1, Red, Difficulty::Easy);
        thread::sleep(Duration::from_millis(2));
        cache.get_or_create(2, Red, Difficulty::Easy);
        thread::sleep(Duration::from_millis(2));
        // Game 1 is now the most recently used
        let again = cache.get_or_create(1, Red, Difficulty::Easy);
        assert!(Arc::ptr_eq(&first, &again));
        thread::sleep(Duration::from_millis(2));

        cache.get_or_create(3, Red, Difficulty::Easy);
        assert_eq!(cache.len(), 2);
        let still_there = cache.get_or_create(1, Red, Difficulty::Easy);
        assert!(Arc::ptr_eq(&first, &still_there));
    }

    #[test]
    fn finished_games_are_dropped() {
        let cache = BotCache::default();
        cache.get_or_create(1, Red, Difficulty::Easy);
        cache.get_or_create(1, White, Difficulty::Hard);
        cache.get_or_create(2, White, Difficulty::Hard);
        cache.remove_game(1);
        assert_eq!(cache.len(), 1);
        cache.remove_game(2);
        assert!(cache.is_empty());
    }

    #[test]
    fn shared_across_threads() {
        let cache = Arc::new(BotCache::default());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    cache.get_or_create(i % 2, Red, Difficulty::Easy);
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cache.len(), 2);
    }
}
