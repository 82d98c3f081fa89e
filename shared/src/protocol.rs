use serde::{Deserialize, Serialize};

use crate::model::{CarDraft, CarId};
use crate::pagination::PageStep;
use crate::router::Route;

/// Everything the garage UI can ask for, routed to one handler.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum Command {
    Go { id: CarId, name: String },
    Back { id: CarId },
    Race,
    Reset,
    Generate,
    Page(PageStep),
    Create(CarDraft),
    Select { id: CarId },
    Update { name: String, color: String },
    Remove { id: CarId },
    Navigate(Route),
}
