pub mod gacha_handler;

pub use gacha_handler::{
    __path_cancel, __path_get_state, __path_list_categories, __path_list_eligible,
    __path_set_category, __path_spin, __path_stream, cancel, get_state, list_categories,
    list_eligible, set_category, spin, stream,
};
