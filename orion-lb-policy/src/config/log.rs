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

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Log {
    #[serde(deserialize_with = "deserialize_log_level", serialize_with = "serialize_log_level")]
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub log_level: Option<EnvFilter>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub log_directory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub log_file: Option<String>,
}

impl Log {
    /// `RUST_LOG` takes precedence over the configured level, which defaults to `warn`.
    pub fn env_filter(&mut self) -> EnvFilter {
        EnvFilter::try_from_default_env().ok().or_else(|| self.log_level.take()).unwrap_or_else(|| {
            EnvFilter::builder().with_default_directive(LevelFilter::WARN.into()).parse_lossy("")
        })
    }
}

impl PartialEq for Log {
    fn eq(&self, other: &Self) -> bool {
        self.log_file == other.log_file
            && self.log_directory == other.log_directory
            && self.log_level.as_ref().map(EnvFilter::to_string) == other.log_level.as_ref().map(EnvFilter::to_string)
    }
}

fn deserialize_log_level<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<EnvFilter>, D::Error> {
    let Some(level) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    EnvFilter::builder()
        .parse(&level)
        .map(Some)
        .map_err(|e| serde::de::Error::custom(format!("invalid log level \"{level}\": {e}")))
}

fn serialize_log_level<S: Serializer>(value: &Option<EnvFilter>, serializer: S) -> Result<S::Ok, S::Error> {
    value.as_ref().map(EnvFilter::to_string).serialize(serializer)
}
