pub mod catalog;
pub mod pool;
pub mod sequence;
pub mod simulation;

pub use catalog::{reference_records, Catalog, EmotionRecord};
pub use pool::WeightedPool;
pub use sequence::SequenceItem;
pub use simulation::{Clock, ConsoleObserver, Emission, EmotionObserver, SimulationRun, SystemClock};
