#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod render;
pub mod source;
pub mod theme;
pub mod viewport;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{TreeConfig, TreeConfigPatch, reset_tree_config, tree_config, update_tree_config};
pub use ir::{FamilyData, Person, Relation, RelationType, Sex};
pub use layout::{TreeLayout, compute_layout, compute_layout_with_config};
pub use parser::{ParseError, parse_family};
pub use source::{FamilySource, InMemorySource, JsonFileSource, RootSelector, load_layout};
pub use theme::Theme;
pub use viewport::Viewport;
