// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod breadcrumb;
pub mod catalog;
pub mod controller;
pub mod filter;
pub mod focus;
pub mod modal;
pub mod model;
pub mod pane;

pub use breadcrumb::*;
pub use catalog::*;
pub use controller::*;
pub use filter::*;
pub use focus::*;
pub use modal::*;
pub use model::*;
pub use pane::*;
