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

use super::builders::{least_request_config, ring_hash_config, round_robin_config, wrr_locality_config, LbPolicyConfig};
use crate::{error::WithNodeOnResult, LbConfigError};
use orion_data_plane_api::envoy::config::cluster::v3::{
    cluster::{ring_hash_lb_config::HashFunction, LbConfig, LbPolicy, RingHashLbConfig},
    Cluster,
};

/// Builds the canonical config from the `lb_policy` enum and the policy specific
/// `lb_config` of a cluster that does not set `load_balancing_policy`.
///
/// Round robin and least request are wrapped in `wrr_locality`. Least request is
/// only accepted when `enable_least_request` is set.
pub fn convert_legacy(cluster: &Cluster, enable_least_request: bool) -> Result<LbPolicyConfig, LbConfigError> {
    let unsupported = |policy: String| LbConfigError::UnsupportedLbPolicy(cluster.name.clone().into(), policy.into());
    match LbPolicy::try_from(cluster.lb_policy) {
        Ok(LbPolicy::RingHash) => convert_ring_hash(cluster).with_node("ring_hash_lb_config"),
        Ok(LbPolicy::RoundRobin) => Ok(wrr_locality_config(round_robin_config())),
        Ok(LbPolicy::LeastRequest) if enable_least_request => {
            let choice_count = match &cluster.lb_config {
                Some(LbConfig::LeastRequestLbConfig(config)) => config.choice_count,
                _ => None,
            };
            Ok(wrr_locality_config(least_request_config(choice_count)))
        },
        Ok(policy) => Err(unsupported(policy.as_str_name().to_owned())),
        Err(_) => Err(unsupported(format!("[unknown LbPolicy {}]", cluster.lb_policy))),
    }
}

fn convert_ring_hash(cluster: &Cluster) -> Result<LbPolicyConfig, LbConfigError> {
    let RingHashLbConfig { minimum_ring_size, hash_function, maximum_ring_size } = match &cluster.lb_config {
        Some(LbConfig::RingHashLbConfig(config)) => config.clone(),
        _ => RingHashLbConfig::default(),
    };
    // the hash function is not part of the resulting config, so it can't be validated later on
    match HashFunction::try_from(hash_function) {
        Ok(HashFunction::XxHash) => Ok(ring_hash_config(minimum_ring_size, maximum_ring_size)),
        Ok(other) => Err(LbConfigError::UnsupportedHashFunction(other.as_str_name().into())),
        Err(_) => Err(LbConfigError::UnsupportedHashFunction(format!("[unknown HashFunction {hash_function}]").into())),
    }
    .with_node("hash_function")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use orion_data_plane_api::envoy::config::cluster::v3::cluster::LeastRequestLbConfig;
    use serde_json::json;

    fn cluster(lb_policy: i32, lb_config: Option<LbConfig>) -> Cluster {
        Cluster { name: "cluster-a".to_owned(), lb_policy, load_balancing_policy: None, lb_config }
    }

    fn ring_hash(hash_function: HashFunction, min: Option<u64>, max: Option<u64>) -> Option<LbConfig> {
        Some(LbConfig::RingHashLbConfig(RingHashLbConfig {
            minimum_ring_size: min,
            hash_function: hash_function as i32,
            maximum_ring_size: max,
        }))
    }

    #[test]
    fn round_robin_is_wrapped() {
        let config = convert_legacy(&cluster(LbPolicy::RoundRobin as i32, None), false).unwrap();
        assert_eq!(config.to_json(), json!({"wrr_locality": {"childPolicy": [{"round_robin": {}}]}}));
    }

    #[test]
    fn ring_hash_sizes() {
        let cluster = cluster(LbPolicy::RingHash as i32, ring_hash(HashFunction::XxHash, Some(16), Some(4096)));
        let config = convert_legacy(&cluster, false).unwrap();
        assert_eq!(config.to_json(), json!({"ring_hash": {"minRingSize": 16, "maxRingSize": 4096}}));
    }

    #[test]
    fn ring_hash_without_config_uses_defaults() {
        let config = convert_legacy(&cluster(LbPolicy::RingHash as i32, None), false).unwrap();
        assert_eq!(config.to_json(), json!({"ring_hash": {}}));
    }

    #[test]
    fn ring_hash_rejects_murmur() {
        // sizes don't matter, even an inverted range fails on the hash function
        let cluster = cluster(LbPolicy::RingHash as i32, ring_hash(HashFunction::MurmurHash2, Some(100), Some(10)));
        let err = convert_legacy(&cluster, false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedHashFunction);
        assert_eq!(err.to_string(), "Error converting field ring_hash_lb_config / hash_function");
        assert_eq!(err.root().to_string(), "invalid ring hash function: MURMUR_HASH_2");
    }

    #[test]
    fn least_request_behind_flag() {
        let lb_config = Some(LbConfig::LeastRequestLbConfig(LeastRequestLbConfig { choice_count: Some(3) }));
        let cluster = cluster(LbPolicy::LeastRequest as i32, lb_config);

        let err = convert_legacy(&cluster, false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedLbPolicy);
        assert_eq!(err.to_string(), "Cluster cluster-a: unsupported lb policy: LEAST_REQUEST");

        let config = convert_legacy(&cluster, true).unwrap();
        assert_eq!(
            config.to_json(),
            json!({"wrr_locality": {"childPolicy": [{"least_request": {"choiceCount": 3}}]}})
        );
    }

    #[test]
    fn least_request_without_choice_count() {
        let config = convert_legacy(&cluster(LbPolicy::LeastRequest as i32, None), true).unwrap();
        assert_eq!(config.to_json(), json!({"wrr_locality": {"childPolicy": [{"least_request": {}}]}}));
    }

    #[test]
    fn other_policies_are_unsupported() {
        for lb_policy in [
            LbPolicy::Random,
            LbPolicy::Maglev,
            LbPolicy::ClusterProvided,
            LbPolicy::LoadBalancingPolicyConfig,
        ] {
            let err = convert_legacy(&cluster(lb_policy as i32, None), true).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::UnsupportedLbPolicy);
        }

        let err = convert_legacy(&cluster(4, None), true).unwrap_err();
        assert_eq!(err.to_string(), "Cluster cluster-a: unsupported lb policy: [unknown LbPolicy 4]");
    }
}
