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

pub mod r#type {
    pub mod v1 {
        /// Predecessor of `xds.type.v3.TypedStruct`, identical on the wire.
        #[derive(Clone, PartialEq, ::prost::Message)]
        pub struct TypedStruct {
            #[prost(string, tag = "1")]
            pub type_url: ::prost::alloc::string::String,
            #[prost(message, optional, tag = "2")]
            pub value: ::core::option::Option<::prost_types::Struct>,
        }
        crate::impl_name!(TypedStruct, "udpa.type.v1", "TypedStruct");
    }
}
