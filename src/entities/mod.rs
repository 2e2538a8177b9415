//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod catalog_link;
pub mod category;
pub mod price;
pub mod price_definition;
pub mod rate_type;
pub mod rental_location;
pub mod season;
pub mod season_definition;

// Re-export specific types to avoid conflicts
pub use catalog_link::{Column as CatalogLinkColumn, Entity as CatalogLink, Model as CatalogLinkModel};
pub use category::{Column as CategoryColumn, Entity as Category, Model as CategoryModel};
pub use price::{Column as PriceColumn, Entity as Price, Model as PriceModel};
pub use price_definition::{
    Column as PriceDefinitionColumn, Entity as PriceDefinition, Model as PriceDefinitionModel,
};
pub use rate_type::{Column as RateTypeColumn, Entity as RateType, Model as RateTypeModel};
pub use rental_location::{
    Column as RentalLocationColumn, Entity as RentalLocation, Model as RentalLocationModel,
};
pub use season::{Column as SeasonColumn, Entity as Season, Model as SeasonModel};
pub use season_definition::{
    Column as SeasonDefinitionColumn, Entity as SeasonDefinition, Model as SeasonDefinitionModel,
};
