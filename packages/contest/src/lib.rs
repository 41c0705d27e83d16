pub mod error;
pub mod form;
pub mod item_list;
pub mod navigation;
pub mod supplier;
pub mod time;
pub mod view;

pub use error::{FormError, RouteError};
pub use form::{ContestConfigForm, ContestConfigInit, FormState};
pub use item_list::ContestItemList;
pub use navigation::{Navigator, Page, Route};
pub use supplier::{ProblemSearch, ProblemSetGenerator, ProblemSupplier};
pub use time::DateTimeFields;
pub use view::{FetchState, FormView, Gates, View};
