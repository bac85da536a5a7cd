pub mod compare;
pub mod page;

pub use compare::__path_handle_compare;
pub use compare::{
    handle_compare, handle_method_not_allowed, handle_preflight, CompareForm, CompareQuery,
    CompareResponse,
};
pub use page::{handle_index, handle_not_found, handle_static};
