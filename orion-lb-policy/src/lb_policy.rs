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

//! Selection of a cluster's load balancing policy.
//!
//! A cluster describes its policy either through the extensible `load_balancing_policy`
//! field, an ordered list of typed candidates, or through the legacy `lb_policy` enum
//! and its policy specific `lb_config`. When `load_balancing_policy` is set it is the
//! only source considered. Both paths produce an [`LbPolicyConfig`], a single policy
//! name mapped to its parameters.

pub mod builders;
pub use builders::LbPolicyConfig;
pub mod converter;
pub use converter::{LoadBalancingPolicyConverter, MAX_RECURSION_DEPTH};
pub mod decoders;
pub use decoders::{PolicyDecoder, PolicyDecoders};
pub mod legacy;
pub mod registry;
pub use registry::{LbPolicyRegistry, StaticLbPolicyRegistry};

use crate::{config::LbPolicySettings, error::WithNodeOnResult, LbConfigError};
use orion_data_plane_api::envoy::config::cluster::v3::Cluster;
use std::sync::Arc;

/// Converts the load balancing configuration of a cluster using the built-in decoders.
pub fn new_config(
    cluster: &Cluster,
    enable_least_request: bool,
    registry: &dyn LbPolicyRegistry,
) -> Result<LbPolicyConfig, LbConfigError> {
    convert_cluster(cluster, enable_least_request, registry, &PolicyDecoders::default())
}

/// Holds what is needed to convert the clusters of a configuration: the registry of
/// available policies, the decoders for typed policy configs and the feature flags.
#[derive(Clone)]
pub struct LbConfigFactory {
    registry: Arc<dyn LbPolicyRegistry>,
    decoders: PolicyDecoders,
    enable_least_request: bool,
}

impl LbConfigFactory {
    pub fn new<R: LbPolicyRegistry + 'static>(registry: R) -> Self {
        Self { registry: Arc::new(registry), decoders: PolicyDecoders::default(), enable_least_request: false }
    }

    pub fn from_settings(settings: &LbPolicySettings) -> Self {
        let registry: StaticLbPolicyRegistry = settings.registered_policies.iter().cloned().collect();
        Self::new(registry).with_least_request(settings.enable_least_request)
    }

    #[must_use]
    pub fn with_decoders(self, decoders: PolicyDecoders) -> Self {
        Self { decoders, ..self }
    }

    #[must_use]
    pub fn with_least_request(self, enable_least_request: bool) -> Self {
        Self { enable_least_request, ..self }
    }

    pub fn decoders_mut(&mut self) -> &mut PolicyDecoders {
        &mut self.decoders
    }

    pub fn new_config(&self, cluster: &Cluster) -> Result<LbPolicyConfig, LbConfigError> {
        convert_cluster(cluster, self.enable_least_request, self.registry.as_ref(), &self.decoders)
    }
}

fn convert_cluster(
    cluster: &Cluster,
    enable_least_request: bool,
    registry: &dyn LbPolicyRegistry,
    decoders: &PolicyDecoders,
) -> Result<LbPolicyConfig, LbConfigError> {
    let config = if let Some(load_balancing_policy) = &cluster.load_balancing_policy {
        tracing::debug!(cluster = cluster.name.as_str(), "converting load_balancing_policy");
        LoadBalancingPolicyConverter::new(registry, decoders)
            .convert(load_balancing_policy)
            .with_node("load_balancing_policy")
    } else {
        tracing::debug!(cluster = cluster.name.as_str(), "converting legacy lb_policy");
        legacy::convert_legacy(cluster, enable_least_request).with_node("lb_policy")
    };
    config.with_name(cluster.name.clone())
}
