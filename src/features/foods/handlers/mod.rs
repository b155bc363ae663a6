pub mod food_handler;

pub use food_handler::{
    __path_create_food, __path_delete_food, __path_get_food, __path_list_foods,
    __path_update_food, create_food, delete_food, get_food, list_foods, update_food,
};
