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

//! Collectors that walk an application or workload down to concrete objects

pub mod application;
pub mod pods;
pub mod resources;
pub mod selector;

pub use self::application::fetch_application;
pub use self::pods::PodCollector;
pub use self::resources::ResourceCollector;
pub use self::selector::{label_selector_string, pod_selector};
