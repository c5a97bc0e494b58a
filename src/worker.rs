use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::debug;

use crate::board::Board;
use crate::bot::Difficulty;
use crate::bot_cache::BotCache;
use crate::game::GameId;
use crate::piece::Color;
use crate::r#move::Move;

/// A request for a bot move
#[derive(Debug, Clone)]
pub struct BotJob {
    pub game_id: GameId,
    pub difficulty: Difficulty,
    pub board: Board,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BotReply {
    pub game_id: GameId,
    pub mv: Option<Move>,
    pub search_time: Duration,
}

/// A fixed set of threads choosing bot moves, so that searches for several
/// games run side by side. Bots come from a shared cache, two jobs for the
/// same seat simply wait on each other
pub struct BotPool {
    jobs: Option<Sender<BotJob>>,
    replies: Receiver<BotReply>,
    workers: Vec<JoinHandle<()>>,
    cache: Arc<BotCache>,
}
impl BotPool {
    pub const MAX_DEFAULT_THREADS: usize = 4;

    pub fn new(threads: usize) -> Self {
        Self::with_cache(threads, Arc::new(BotCache::default()))
    }

    pub fn with_cache(threads: usize, cache: Arc<BotCache>) -> Self {
        let (job_sender, job_receiver) = mpsc::channel::<BotJob>();
        let (reply_sender, replies) = mpsc::channel();
        let job_receiver = Arc::new(Mutex::new(job_receiver));

        let workers = (0..threads.max(1))
            .map(|id| new_worker(id, &job_receiver, reply_sender.clone(), &cache))
            .collect();

        BotPool {
            jobs: Some(job_sender),
            replies,
            workers,
            cache,
        }
    }

    /// Queues a job, returns false if the pool is shutting down
    pub fn submit(&self, job: BotJob) -> bool {
        match &self.jobs {
            Some(sender) => sender.send(job).is_ok(),
            None => false,
        }
    }

    /// Blocks until a worker is done with a job
    pub fn recv(&self) -> Option<BotReply> {
        self.replies.recv().ok()
    }

    pub fn threads(&self) -> usize {
        self.workers.len()
    }

    pub fn cache(&self) -> &Arc<BotCache> {
        &self.cache
    }
}
impl Default for BotPool {
    fn default() -> Self {
        Self::new(num_cpus::get().min(Self::MAX_DEFAULT_THREADS))
    }
}
impl Drop for BotPool {
    fn drop(&mut self) {
        // Workers leave their loop once the channel is closed
        self.jobs.take();
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}

fn new_worker(
    id: usize,
    jobs: &Arc<Mutex<Receiver<BotJob>>>,
    replies: Sender<BotReply>,
    cache: &Arc<BotCache>,
) -> JoinHandle<()> {
    let jobs = Arc::clone(jobs);
    let cache = Arc::clone(cache);
    thread::spawn(move || loop {
        let next = jobs.lock().unwrap_or_else(PoisonError::into_inner).recv();
        let job = match next {
            Ok(job) => job,
            Err(_) => break,
        };

        let start = Instant::now();
        let bot = cache.get_or_create(job.game_id, job.color, job.difficulty);
        let mv = bot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .choose_move(&job.board, job.color);
        let search_time = start.elapsed();
        debug!("worker {}: game {} done in {}ms", id, job.game_id, search_time.as_millis());

        let reply = BotReply {
            game_id: job.game_id,
            mv,
            search_time,
        };
        if replies.send(reply).is_err() {
            break;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::move_generator::generate;

    #[test]
    fn every_job_gets_a_reply() {
        let pool = BotPool::new(2);
        assert_eq!(pool.threads(), 2);
        let board = Board::starting();
        for game_id in 0..4 {
            assert!(pool.submit(BotJob {
                game_id,
                difficulty: Difficulty::Medium,
                board: board.clone(),
                color: Color::White,
            }));
        }

        let legal = generate(&board, Color::White);
        let mut answered: Vec<GameId> = (0..4)
            .map(|_| pool.recv().unwrap())
            .map(|reply| {
                assert!(reply.mv.as_ref().map_or(false, |m| legal.contains(m)));
                reply.game_id
            })
            .collect();
        answered.sort_unstable();
        assert_eq!(answered, vec![0, 1, 2, 3]);
        assert_eq!(pool.cache().len(), 4);
    }

    #[test]
    fn stuck_sides_get_an_empty_reply() {
        let pool = BotPool::new(1);
        pool.submit(BotJob {
            game_id: 9,
            difficulty: Difficulty::Easy,
            board: Board::new("8/8/8/8/8/2r5/1r6/W7"),
            color: Color::White,
        });
        let reply = pool.recv().unwrap();
        assert_eq!(reply.game_id, 9);
        assert_eq!(reply.mv, None);
    }

    #[test]
    fn default_pool_is_small() {
        let pool = BotPool::default();
        assert!((1..=BotPool::MAX_DEFAULT_THREADS).contains(&pool.threads()));
    }
}
