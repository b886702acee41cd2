// SPDX-License-Identifier: MIT

//! Building blocks: model collaborators, nodes and errors

pub mod error;
pub mod model;
pub mod node;
