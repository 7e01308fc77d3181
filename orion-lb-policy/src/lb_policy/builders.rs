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

use crate::LbConfigError;
use compact_str::CompactString;
use serde::{de::Error as _, ser::SerializeMap, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt::Display;

pub const ROUND_ROBIN_POLICY_NAME: &str = "round_robin";

pub const RING_HASH_POLICY_NAME: &str = "ring_hash";
pub const MIN_RING_SIZE_FIELD_NAME: &str = "minRingSize";
pub const MAX_RING_SIZE_FIELD_NAME: &str = "maxRingSize";

pub const LEAST_REQUEST_POLICY_NAME: &str = "least_request";
pub const CHOICE_COUNT_FIELD_NAME: &str = "choiceCount";

pub const WRR_LOCALITY_POLICY_NAME: &str = "wrr_locality";
pub const CHILD_POLICY_FIELD_NAME: &str = "childPolicy";

/// Policies this crate knows how to build a config for.
pub const BUILTIN_POLICY_NAMES: [&str; 4] =
    [ROUND_ROBIN_POLICY_NAME, RING_HASH_POLICY_NAME, LEAST_REQUEST_POLICY_NAME, WRR_LOCALITY_POLICY_NAME];

/// A load balancing policy config in its canonical form: a single policy name mapped
/// to the parameters of that policy.
///
/// Serializes as a JSON object with exactly one key, e.g. `{"ring_hash": {"minRingSize": 1024}}`.
/// The single root key is guaranteed by construction; deserialization rejects anything else.
/// Numeric parameters of the built-in policies are JSON integers (`10`, never `10.0`),
/// custom policy numbers are integers whenever they are integral.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LbPolicyConfig {
    name: CompactString,
    config: Map<String, Value>,
}

impl LbPolicyConfig {
    pub fn new<T: Into<CompactString>>(name: T, config: Map<String, Value>) -> Self {
        Self { name: name.into(), config }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &Map<String, Value> {
        &self.config
    }

    pub fn into_parts(self) -> (CompactString, Map<String, Value>) {
        (self.name, self.config)
    }

    pub fn to_json(&self) -> Value {
        let mut root = Map::with_capacity(1);
        root.insert(self.name.to_string(), Value::Object(self.config.clone()));
        Value::Object(root)
    }
}

impl Display for LbPolicyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_json().to_string())
    }
}

impl Serialize for LbPolicyConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.name.as_str(), &self.config)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for LbPolicyConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let root = Map::<String, Value>::deserialize(deserializer)?;
        if root.len() != 1 {
            return Err(D::Error::custom(format!(
                "a load balancing policy config must have exactly one root key, found {}",
                root.len()
            )));
        }
        let mut entries = root.into_iter();
        match entries.next() {
            Some((name, Value::Object(config))) => Ok(Self::new(name, config)),
            Some((name, _)) => Err(D::Error::custom(format!("the config of policy \"{name}\" is not an object"))),
            None => Err(D::Error::custom("empty load balancing policy config")),
        }
    }
}

/// Round robin is not configurable, an empty parameter map selects it.
pub fn round_robin_config() -> LbPolicyConfig {
    LbPolicyConfig::new(ROUND_ROBIN_POLICY_NAME, Map::new())
}

pub fn ring_hash_config(min_ring_size: Option<u64>, max_ring_size: Option<u64>) -> LbPolicyConfig {
    let mut config = Map::new();
    if let Some(min_ring_size) = min_ring_size {
        config.insert(MIN_RING_SIZE_FIELD_NAME.to_owned(), min_ring_size.into());
    }
    if let Some(max_ring_size) = max_ring_size {
        config.insert(MAX_RING_SIZE_FIELD_NAME.to_owned(), max_ring_size.into());
    }
    LbPolicyConfig::new(RING_HASH_POLICY_NAME, config)
}

pub fn least_request_config(choice_count: Option<u32>) -> LbPolicyConfig {
    let mut config = Map::new();
    if let Some(choice_count) = choice_count {
        config.insert(CHOICE_COUNT_FIELD_NAME.to_owned(), choice_count.into());
    }
    LbPolicyConfig::new(LEAST_REQUEST_POLICY_NAME, config)
}

/// Applies locality weighting on top of `child_policy`.
pub fn wrr_locality_config(child_policy: LbPolicyConfig) -> LbPolicyConfig {
    let mut config = Map::with_capacity(1);
    config.insert(CHILD_POLICY_FIELD_NAME.to_owned(), Value::Array(vec![child_policy.to_json()]));
    LbPolicyConfig::new(WRR_LOCALITY_POLICY_NAME, config)
}

/// Wraps the JSON config of a custom policy under the name derived from its type url.
pub fn custom_config(type_url: &str, value: Value) -> Result<LbPolicyConfig, LbConfigError> {
    match value {
        Value::Object(config) => Ok(LbPolicyConfig::new(policy_name_from_type_url(type_url), config)),
        _ => Err(LbConfigError::InvalidCustomConfig(type_url.to_owned().into(), "does not contain a JSON object")),
    }
}

/// The last segment of a type url, `type.googleapis.com/test.MyPolicy` names `test.MyPolicy`.
pub fn policy_name_from_type_url(type_url: &str) -> &str {
    type_url.rsplit_once('/').map_or(type_url, |(_, name)| name)
}
