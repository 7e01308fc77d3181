// SPDX-FileCopyrightText: © 2025 Huawei Cloud Computing Technologies Co., Ltd
// SPDX-License-Identifier: Apache-2.0
//
// Copyright 2025 Huawei Cloud Computing Technologies Co., Ltd
//
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
//

//! Protobuf messages for the subset of the Envoy and xDS APIs used to select a
//! cluster's load balancing policy.
//!
//! Field numbers follow the upstream `.proto` definitions, so payloads produced by
//! a control plane decode directly into these types. Fields this workspace does
//! not consume are omitted and skipped by the decoder as unknown fields.

pub use prost;
pub use prost_types;

pub mod decode;
pub mod envoy;
pub mod udpa;
pub mod xds;

pub mod google {
    pub mod protobuf {
        pub use prost_types::{value, Any, ListValue, NullValue, Struct, Value};
    }
}

/// Implements [`prost::Name`] with the `type.googleapis.com` type url used in `Any` payloads.
macro_rules! impl_name {
    ($message:ty, $package:literal, $name:literal) => {
        impl ::prost::Name for $message {
            const NAME: &'static str = $name;
            const PACKAGE: &'static str = $package;

            fn full_name() -> ::prost::alloc::string::String {
                concat!($package, ".", $name).into()
            }

            fn type_url() -> ::prost::alloc::string::String {
                concat!("type.googleapis.com/", $package, ".", $name).into()
            }
        }
    };
}
pub(crate) use impl_name;
