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

pub mod config;
mod error;
pub mod lb_policy;
pub mod options;

pub use error::{ErrorKind, FieldTrace, LbConfigError};
pub use lb_policy::{new_config, LbConfigFactory, LbPolicyConfig};

use std::{borrow::Cow, path::PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("failed to read config from \"{}\"", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_path_to_error::Error<serde_yaml::Error>,
    },
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("failed to update the log configuration")]
    Logging(#[from] tracing_subscriber::reload::Error),
    #[error("failed to decode protobuf message")]
    Decode(#[from] orion_data_plane_api::prost::DecodeError),
    #[error(transparent)]
    LbConfig(#[from] LbConfigError),
    #[error("{0}")]
    Message(Cow<'static, str>),
}

impl From<&'static str> for Error {
    fn from(msg: &'static str) -> Self {
        Self::Message(msg.into())
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Self::Message(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
