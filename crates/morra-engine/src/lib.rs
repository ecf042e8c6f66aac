//! Monte Carlo tree search engine for morra.
//!
//! Built on the position model in `morra-core`: a lazily grown arena tree,
//! UCB1 bandit selection, random-playout evaluation, and a cooperative
//! time-budget loop with subtree reuse across plies.

pub mod oracle;
pub mod player;
pub mod search;
pub mod time;

pub use oracle::{NoOracle, Oracle, OracleVerdict, TableOracle};
pub use player::{Player, SearchStats};
pub use search::control::{Scheduler, TimeScheduler, TrajectoryBudget};
pub use search::draw::{dead_material, fifty_moves};
pub use search::heuristics::{CaptureBiased, MovePicker, UniformPicker};
pub use search::rollout::RolloutPolicy;
pub use search::tree::{BestMoveRule, NodeId, SearchTree};
pub use search::value::{FIRST_PLAY_URGENCY, UcbValue, Value};
pub use time::move_budget;
