// Copyright 2025 JiangLong.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Named operations over structured documents.
//!
//! A workflow engine (or the `call` subcommand) hands an operation a JSON
//! document and gets one back. Operations are registered by provider and
//! operation name in an `OperationRegistry` built once at startup.

pub mod bridge;
pub mod query;
pub mod registry;

pub use self::bridge::{get_string, lookup, Outcome};
pub use self::query::install;
pub use self::registry::{Handler, OperationRegistry};
