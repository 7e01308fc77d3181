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

use super::builders::BUILTIN_POLICY_NAMES;
use compact_str::CompactString;
use std::collections::BTreeSet;

/// Answers whether a load balancing policy implementation exists for a name.
///
/// The registry is owned by whoever instantiates the balancers, the converter only
/// reads from it, so implementations must be safe to query concurrently.
pub trait LbPolicyRegistry: Send + Sync {
    fn is_registered(&self, policy_name: &str) -> bool;
}

impl<F> LbPolicyRegistry for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_registered(&self, policy_name: &str) -> bool {
        self(policy_name)
    }
}

/// A fixed set of policy names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticLbPolicyRegistry {
    names: BTreeSet<CompactString>,
}

impl StaticLbPolicyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The policies orion ships balancers for.
    pub fn with_builtin_policies() -> Self {
        BUILTIN_POLICY_NAMES.into_iter().collect()
    }

    pub fn register<T: Into<CompactString>>(&mut self, policy_name: T) -> bool {
        self.names.insert(policy_name.into())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(CompactString::as_str)
    }
}

impl<T: Into<CompactString>> FromIterator<T> for StaticLbPolicyRegistry {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self { names: iter.into_iter().map(Into::into).collect() }
    }
}

impl LbPolicyRegistry for StaticLbPolicyRegistry {
    fn is_registered(&self, policy_name: &str) -> bool {
        self.names.contains(policy_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registry() {
        let registry = StaticLbPolicyRegistry::with_builtin_policies();
        assert!(registry.is_registered("round_robin"));
        assert!(registry.is_registered("wrr_locality"));
        assert!(!registry.is_registered("pick_first"));
        assert_eq!(registry.names().count(), 4);
    }

    #[test]
    fn other_registries() {
        let mut registry = StaticLbPolicyRegistry::new();
        assert!(registry.register("myPolicy"));
        assert!(!registry.register("myPolicy"));
        assert!(registry.is_registered("myPolicy"));

        let from_names: StaticLbPolicyRegistry = ["round_robin", "ring_hash"].into_iter().collect();
        assert!(from_names.is_registered("ring_hash"));
        assert!(!from_names.is_registered("least_request"));

        let everything = |_: &str| true;
        assert!(everything.is_registered("anything"));
    }
}
