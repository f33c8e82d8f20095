mod item;
mod ledger;
mod money;

pub use item::*;
pub use ledger::*;
pub use money::*;
