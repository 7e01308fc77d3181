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

pub mod log;
pub use log::Log;

use crate::{lb_policy::builders::BUILTIN_POLICY_NAMES, options::Options, Error, Result};
use compact_str::CompactString;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{env::var, fs::File, path::Path};

/// Overrides `lb_policy.enable_least_request`, accepts `true` or `false`.
pub const ENABLE_LEAST_REQUEST_ENV: &str = "ORION_LB_ENABLE_LEAST_REQUEST";

pub(crate) fn is_default<T: PartialEq + Default>(value: &T) -> bool {
    *value == T::default()
}

#[derive(Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Config {
    #[serde(skip_serializing_if = "is_default", default)]
    pub logging: Log,
    #[serde(skip_serializing_if = "is_default", default)]
    pub lb_policy: LbPolicySettings,
}

impl Config {
    pub fn new(opt: &Options) -> Result<Self> {
        let config = match &opt.config {
            Some(path) => deserialize_yaml(path)?,
            None => Self::default(),
        };
        Ok(config.apply_options(opt))
    }

    fn apply_options(self, opt: &Options) -> Self {
        let lb_policy = self.lb_policy.update_from_env_and_options(opt);
        if lb_policy.registered_policies.is_empty() {
            tracing::warn!("no load balancing policies are registered, every extensible policy will be rejected");
        }
        Self { lb_policy, ..self }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct LbPolicySettings {
    #[serde(skip_serializing_if = "is_default", default)]
    pub enable_least_request: bool,
    #[serde(default = "builtin_policies")]
    pub registered_policies: Vec<CompactString>,
}

fn builtin_policies() -> Vec<CompactString> {
    BUILTIN_POLICY_NAMES.into_iter().map(CompactString::from).collect()
}

impl Default for LbPolicySettings {
    fn default() -> Self {
        Self { enable_least_request: false, registered_policies: builtin_policies() }
    }
}

impl LbPolicySettings {
    /// Precedence is environment, then command line, then the configuration file.
    #[must_use]
    pub fn update_from_env_and_options(self, opt: &Options) -> Self {
        self.update_from(var(ENABLE_LEAST_REQUEST_ENV).ok().as_deref(), opt)
    }

    fn update_from(self, enable_least_request_env: Option<&str>, opt: &Options) -> Self {
        LbPolicySettings {
            enable_least_request: enable_least_request_env
                .and_then(|v| v.parse::<bool>().ok())
                .or(opt.enable_least_request.then_some(true))
                .unwrap_or(self.enable_least_request),

            registered_policies: opt
                .registered_policies
                .as_ref()
                .map(|names| names.iter().map(CompactString::from).collect())
                .unwrap_or(self.registered_policies),
        }
    }
}

pub fn deserialize_yaml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path)?;
    serde_path_to_error::deserialize(serde_yaml::Deserializer::from_reader(&file))
        .map_err(|source| Error::Config { path: path.to_owned(), source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = LbPolicySettings::default();
        assert!(!settings.enable_least_request);
        let names: Vec<&str> = settings.registered_policies.iter().map(CompactString::as_str).collect();
        assert_eq!(names, ["round_robin", "ring_hash", "least_request", "wrr_locality"]);

        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn options_override_file() {
        let mut opt = Options::from_cluster_path("cluster.pb");
        opt.registered_policies = Some(vec!["round_robin".to_owned()]);
        let settings = LbPolicySettings::default().update_from(None, &opt);
        assert_eq!(settings.registered_policies, vec![CompactString::from("round_robin")]);
    }

    #[test]
    fn enable_least_request_precedence() {
        let from_file = LbPolicySettings { enable_least_request: true, ..Default::default() };
        let mut opt = Options::from_cluster_path("cluster.pb");

        // the file value stands when nothing overrides it
        assert!(from_file.clone().update_from(None, &opt).enable_least_request);
        assert!(!LbPolicySettings::default().update_from(None, &opt).enable_least_request);

        // command line beats the file
        opt.enable_least_request = true;
        assert!(LbPolicySettings::default().update_from(None, &opt).enable_least_request);

        // environment beats the command line and the file
        assert!(!LbPolicySettings::default().update_from(Some("false"), &opt).enable_least_request);
        assert!(!from_file.clone().update_from(Some("false"), &opt).enable_least_request);
        opt.enable_least_request = false;
        assert!(LbPolicySettings::default().update_from(Some("true"), &opt).enable_least_request);

        // an unparsable environment value is ignored
        assert!(!LbPolicySettings::default().update_from(Some("yes"), &opt).enable_least_request);
        assert!(from_file.update_from(Some("1"), &opt).enable_least_request);
        opt.enable_least_request = true;
        assert!(LbPolicySettings::default().update_from(Some(""), &opt).enable_least_request);
    }

    #[test]
    fn roundtrip() {
        let config: Config = serde_yaml::from_str(
            r#"
logging:
  log_level: "orion_lb_policy=debug"
lb_policy:
  enable_least_request: true
  registered_policies: [round_robin, myPolicy]
"#,
        )
        .unwrap();
        assert!(config.lb_policy.enable_least_request);
        let serialized = serde_yaml::to_string(&config).unwrap();
        let deserialized: Config = serde_yaml::from_str(&serialized).unwrap();
        assert_eq!(config, deserialized);
    }
}
