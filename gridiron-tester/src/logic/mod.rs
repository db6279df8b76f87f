pub mod career_tester;
pub mod policy;
pub mod reports;
pub mod scenarios;
pub mod seeds;
pub mod tester;

pub use career_tester::{CareerPlan, CareerTester};
pub use policy::SidePolicy;
pub use seeds::resolve_seed_inputs;
pub use tester::*;
