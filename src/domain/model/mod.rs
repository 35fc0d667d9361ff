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

//! Value types produced and consumed by the query operations

pub mod application;
pub mod endpoint;
pub mod ingress;
pub mod logs;
pub mod resource;

pub use self::application::{split_api_version, AppliedResource};
pub use self::endpoint::{Endpoint, Protocol, ServiceEndpoint};
pub use self::ingress::IngressView;
pub use self::logs::{LogOptions, LogResult, LogWindow};
pub use self::resource::{FilterOption, QueryOption, Resource};
