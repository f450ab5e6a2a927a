use std::future::Future;
use std::time::Duration;

use log::{info, warn};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use uuid::Uuid;

use crate::domain::lease::LeaseStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadershipStatus {
	Leader,
	Follower,
}

#[derive(Debug, Clone)]
pub struct LeaderElectionConfig {
	pub lock_key:       String,
	pub lease_ttl:      Duration,
	pub renew_interval: Duration,
}

/// Competes for a single shared lease. Only the instance named in the lease
/// is leader.
pub struct LeaderElection<L: LeaseStore + Clone> {
	store:       L,
	config:      LeaderElectionConfig,
	instance_id: Uuid,
	status:      watch::Sender<LeadershipStatus>,
}

/// Handed to leader-only tasks so they can confirm they still hold the lease.
#[derive(Clone)]
pub struct Leadership<L: LeaseStore + Clone> {
	store:       L,
	lock_key:    String,
	instance_id: Uuid,
	status:      watch::Receiver<LeadershipStatus>,
}

impl<L: LeaseStore + Clone> Leadership<L> {
	pub async fn is_still_leader(&self) -> bool {
		let status = *self.status.borrow();
		if status != LeadershipStatus::Leader {
			return false;
		}

		match self.store.read(&self.lock_key).await {
			Ok(Some(lease)) => lease.holder_id == self.instance_id,
			Ok(None) => false,
			Err(e) => {
				warn!("Could not confirm leadership: {e}");
				false
			}
		}
	}
}

impl<L: LeaseStore + Clone> LeaderElection<L> {
	pub fn new(store: L, config: LeaderElectionConfig) -> Self {
		let (status, _) = watch::channel(LeadershipStatus::Follower);
		Self {
			store,
			config,
			instance_id: Uuid::new_v4(),
			status,
		}
	}

	pub fn instance_id(&self) -> Uuid {
		self.instance_id
	}

	pub fn subscribe(&self) -> watch::Receiver<LeadershipStatus> {
		self.status.subscribe()
	}

	pub fn leadership(&self) -> Leadership<L> {
		Leadership {
			store:       self.store.clone(),
			lock_key:    self.config.lock_key.clone(),
			instance_id: self.instance_id,
			status:      self.status.subscribe(),
		}
	}

	/// Runs one election step and publishes the resulting status.
	///
	/// A follower tries to claim a free lease; a leader tries to extend the
	/// lease it holds. Any store failure leaves this instance a follower.
	pub async fn tick(&self) -> LeadershipStatus {
		let key = &self.config.lock_key;
		let ttl = self.config.lease_ttl;

		let current = *self.status.borrow();
		let next = match current {
			LeadershipStatus::Follower => {
				match self.store.try_acquire(key, self.instance_id, ttl).await {
					Ok(true) => {
						info!("Instance {} acquired leadership", self.instance_id);
						LeadershipStatus::Leader
					}
					Ok(false) => LeadershipStatus::Follower,
					Err(e) => {
						warn!("Could not compete for leadership: {e}");
						LeadershipStatus::Follower
					}
				}
			}
			LeadershipStatus::Leader => {
				match self.store.renew(key, self.instance_id, ttl).await {
					Ok(true) => LeadershipStatus::Leader,
					Ok(false) => {
						warn!("Instance {} lost its lease", self.instance_id);
						LeadershipStatus::Follower
					}
					Err(e) => {
						warn!("Could not renew leadership, stepping down: {e}");
						LeadershipStatus::Follower
					}
				}
			}
		};

		self.status.send_replace(next);
		next
	}

	/// Ticks forever. `on_elected` is spawned whenever this instance is leader
	/// and no leader task is running; the task is aborted on losing the lease.
	pub async fn run<F, Fut>(self, on_elected: F)
	where
		F: Fn(Leadership<L>) -> Fut + Send + 'static,
		Fut: Future<Output = ()> + Send + 'static,
	{
		let mut ticker = interval(self.config.renew_interval);
		ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
		let mut leader_task: Option<JoinHandle<()>> = None;

		loop {
			ticker.tick().await;

			match self.tick().await {
				LeadershipStatus::Leader => {
					if leader_task.as_ref().is_none_or(|task| task.is_finished()) {
						leader_task = Some(tokio::spawn(on_elected(self.leadership())));
					}
				}
				LeadershipStatus::Follower => {
					if let Some(task) = leader_task.take() {
						task.abort();
						info!("Stopped leader-only tasks");
					}
				}
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;
	use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

	use async_trait::async_trait;

	use super::*;
	use crate::domain::lease::{CoordinationError, LeaseRecord};
	use crate::infrastructure::persistence::in_memory_coordination_store::InMemoryCoordinationStore;

	const KEY: &str = "leader_lock";

	fn config() -> LeaderElectionConfig {
		LeaderElectionConfig {
			lock_key:       KEY.to_string(),
			lease_ttl:      Duration::from_secs(5),
			renew_interval: Duration::from_secs(3),
		}
	}

	#[derive(Clone, Default)]
	struct FlakyLeases {
		inner:   InMemoryCoordinationStore,
		failing: Arc<AtomicBool>,
	}

	impl FlakyLeases {
		fn check(&self) -> Result<(), CoordinationError> {
			if self.failing.load(Ordering::SeqCst) {
				return Err(CoordinationError::Unavailable {
					message: "connection reset".to_string(),
				});
			}
			Ok(())
		}
	}

	#[async_trait]
	impl LeaseStore for FlakyLeases {
		async fn try_acquire(
			&self,
			key: &str,
			holder_id: Uuid,
			ttl: Duration,
		) -> Result<bool, CoordinationError> {
			self.check()?;
			self.inner.try_acquire(key, holder_id, ttl).await
		}

		async fn renew(
			&self,
			key: &str,
			holder_id: Uuid,
			ttl: Duration,
		) -> Result<bool, CoordinationError> {
			self.check()?;
			self.inner.renew(key, holder_id, ttl).await
		}

		async fn read(
			&self,
			key: &str,
		) -> Result<Option<LeaseRecord>, CoordinationError> {
			self.check()?;
			self.inner.read(key).await
		}
	}

	#[tokio::test]
	async fn test_exactly_one_of_two_instances_becomes_leader() {
		let store = InMemoryCoordinationStore::new();
		let a = LeaderElection::new(store.clone(), config());
		let b = LeaderElection::new(store.clone(), config());

		let (a_status, b_status) = tokio::join!(a.tick(), b.tick());

		assert_ne!(a_status, b_status);
		assert_eq!(*a.subscribe().borrow(), a_status);
	}

	#[tokio::test]
	async fn test_leader_steps_down_after_its_lease_is_taken_over() {
		let store = InMemoryCoordinationStore::new();
		let a = LeaderElection::new(store.clone(), config());
		let b = LeaderElection::new(store.clone(), config());
		assert_eq!(a.tick().await, LeadershipStatus::Leader);
		assert_eq!(b.tick().await, LeadershipStatus::Follower);

		store.expire(KEY).await;

		assert_eq!(b.tick().await, LeadershipStatus::Leader);
		assert_eq!(a.tick().await, LeadershipStatus::Follower);
		assert!(!a.leadership().is_still_leader().await);
		assert!(b.leadership().is_still_leader().await);
	}

	#[tokio::test]
	async fn test_store_errors_mean_not_leader() {
		let store = FlakyLeases::default();
		let election = LeaderElection::new(store.clone(), config());
		assert_eq!(election.tick().await, LeadershipStatus::Leader);

		store.failing.store(true, Ordering::SeqCst);

		assert!(!election.leadership().is_still_leader().await);
		assert_eq!(election.tick().await, LeadershipStatus::Follower);
		assert_eq!(election.tick().await, LeadershipStatus::Follower);
	}

	#[tokio::test(start_paused = true)]
	async fn test_leader_task_follows_the_lease() {
		let store = InMemoryCoordinationStore::new();
		let election = LeaderElection::new(store.clone(), config());
		let status = election.subscribe();
		let rival = LeaderElection::new(store.clone(), config());
		let started = Arc::new(AtomicUsize::new(0));

		let counter = Arc::clone(&started);
		tokio::spawn(election.run(move |leadership| {
			counter.fetch_add(1, Ordering::SeqCst);
			async move {
				while leadership.is_still_leader().await {
					tokio::time::sleep(Duration::from_secs(1)).await;
				}
			}
		}));

		tokio::time::sleep(Duration::from_millis(10)).await;
		assert_eq!(*status.borrow(), LeadershipStatus::Leader);
		assert_eq!(started.load(Ordering::SeqCst), 1);

		store.expire(KEY).await;
		assert_eq!(rival.tick().await, LeadershipStatus::Leader);

		tokio::time::sleep(Duration::from_secs(3)).await;
		assert_eq!(*status.borrow(), LeadershipStatus::Follower);

		store.expire(KEY).await;
		tokio::time::sleep(Duration::from_secs(3)).await;
		assert_eq!(*status.borrow(), LeadershipStatus::Leader);
		assert_eq!(started.load(Ordering::SeqCst), 2);
	}
}
