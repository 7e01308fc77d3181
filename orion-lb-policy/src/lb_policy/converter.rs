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

use super::{builders::LbPolicyConfig, decoders::PolicyDecoders, registry::LbPolicyRegistry};
use crate::{error::WithNodeOnResult, LbConfigError};
use orion_data_plane_api::envoy::config::cluster::v3::LoadBalancingPolicy;

/// Deepest nesting of policy lists (through `wrr_locality`) that is converted.
pub const MAX_RECURSION_DEPTH: usize = 16;

/// Converts an extensible `LoadBalancingPolicy` into the canonical config of the first
/// candidate that can be both decoded and instantiated.
///
/// * a candidate whose type url has no decoder, or whose policy name is not in the
///   registry, is logged and skipped
/// * a candidate that fails to decode or validate aborts the conversion, the
///   remaining candidates are not looked at
pub struct LoadBalancingPolicyConverter<'a> {
    registry: &'a dyn LbPolicyRegistry,
    decoders: &'a PolicyDecoders,
}

impl<'a> LoadBalancingPolicyConverter<'a> {
    pub fn new(registry: &'a dyn LbPolicyRegistry, decoders: &'a PolicyDecoders) -> Self {
        Self { registry, decoders }
    }

    pub fn convert(&self, policy: &LoadBalancingPolicy) -> Result<LbPolicyConfig, LbConfigError> {
        self.convert_policy(policy, 0)
    }

    /// Converts a policy list found `depth` levels below the cluster.
    pub fn convert_policy(&self, policy: &LoadBalancingPolicy, depth: usize) -> Result<LbPolicyConfig, LbConfigError> {
        if depth > MAX_RECURSION_DEPTH {
            return Err(LbConfigError::RecursionExceeded(MAX_RECURSION_DEPTH));
        }
        tracing::trace!(depth, candidates = policy.policies.len(), "converting load balancing policy");

        for (index, candidate) in policy.policies.iter().enumerate() {
            let Some(typed_config) =
                candidate.typed_extension_config.as_ref().and_then(|extension| extension.typed_config.as_ref())
            else {
                tracing::warn!(index, depth, "policy has no typed config, skipping");
                continue;
            };
            let type_url = typed_config.type_url.as_str();
            let Some(decoder) = self.decoders.get(type_url) else {
                tracing::warn!(type_url, depth, "policy type is not supported, skipping");
                continue;
            };

            let config = decoder.convert(typed_config, self, depth).with_index(index).with_node("policies")?;
            // the config has a single root entry named after the policy, which has to exist in the registry
            if self.registry.is_registered(config.name()) {
                tracing::debug!(policy = config.name(), depth, "selected load balancing policy");
                return Ok(config);
            }
            tracing::warn!(type_url, policy = config.name(), depth, "policy not found in the lb registry, skipping");
        }

        Err(LbConfigError::NoSupportedPolicy(candidate_type_urls(policy).into()))
    }
}

fn candidate_type_urls(policy: &LoadBalancingPolicy) -> String {
    policy
        .policies
        .iter()
        .map(|candidate| {
            candidate
                .typed_extension_config
                .as_ref()
                .and_then(|extension| extension.typed_config.as_ref())
                .map_or("<none>", |typed_config| typed_config.type_url.as_str())
        })
        .collect::<Vec<_>>()
        .join(", ")
}
