// SPDX-License-Identifier: MIT

pub mod sequences;
pub mod tasks;
