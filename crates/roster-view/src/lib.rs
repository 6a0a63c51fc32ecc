// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod actions;
pub mod announce;
pub mod combobox;
pub mod debounce;
pub mod filter;
pub mod regions;
pub mod sort;
pub mod table;

pub use actions::*;
pub use announce::*;
pub use combobox::*;
pub use debounce::*;
pub use filter::*;
pub use regions::*;
pub use sort::*;
pub use table::*;
