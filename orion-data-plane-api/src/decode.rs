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

use crate::google::protobuf::Any;
use prost::{DecodeError, Message};

#[derive(Debug, thiserror::Error)]
pub enum DecodeAnyError {
    #[error("Failed to decode protobuf extension type({0})")]
    ProtobufError(&'static str, #[source] DecodeError),
}

/// Decode payload from Any type into a generic return type.
///
/// - err_desc is used in the returned error message.
///
/// .type_url is not checked, it is up to the caller to verify it
/// matches the output type
pub fn decode_any_type<R>(any: &Any, err_desc: &'static str) -> Result<R, DecodeAnyError>
where
    R: Message + Default,
{
    R::decode(any.value.as_slice()).map_err(|e| DecodeAnyError::ProtobufError(err_desc, e))
}
