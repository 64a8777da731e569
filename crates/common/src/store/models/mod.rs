//! SeaORM entity models
//!
//! Database entities for the generated lookup database

mod wiki;

pub use wiki::{
    Entity as WikiEntity,
    Model as WikiRow,
    ActiveModel as WikiActiveModel,
    Column as WikiColumn,
};
