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

pub mod config {
    pub mod core {
        pub mod v3 {
            /// Message type for extension configuration.
            #[derive(Clone, PartialEq, ::prost::Message)]
            pub struct TypedExtensionConfig {
                #[prost(string, tag = "1")]
                pub name: ::prost::alloc::string::String,
                #[prost(message, optional, tag = "2")]
                pub typed_config: ::core::option::Option<::prost_types::Any>,
            }
            crate::impl_name!(TypedExtensionConfig, "envoy.config.core.v3", "TypedExtensionConfig");
        }
    }

    pub mod cluster {
        pub mod v3 {
            /// Configuration for an upstream cluster, reduced to its load balancing fields.
            #[derive(Clone, PartialEq, ::prost::Message)]
            pub struct Cluster {
                #[prost(string, tag = "1")]
                pub name: ::prost::alloc::string::String,
                #[prost(enumeration = "cluster::LbPolicy", tag = "6")]
                pub lb_policy: i32,
                #[prost(message, optional, tag = "41")]
                pub load_balancing_policy: ::core::option::Option<LoadBalancingPolicy>,
                #[prost(oneof = "cluster::LbConfig", tags = "23, 37")]
                pub lb_config: ::core::option::Option<cluster::LbConfig>,
            }
            crate::impl_name!(Cluster, "envoy.config.cluster.v3", "Cluster");

            pub mod cluster {
                #[derive(Clone, PartialEq, ::prost::Message)]
                pub struct RingHashLbConfig {
                    #[prost(message, optional, tag = "1")]
                    pub minimum_ring_size: ::core::option::Option<u64>,
                    #[prost(enumeration = "ring_hash_lb_config::HashFunction", tag = "3")]
                    pub hash_function: i32,
                    #[prost(message, optional, tag = "4")]
                    pub maximum_ring_size: ::core::option::Option<u64>,
                }

                pub mod ring_hash_lb_config {
                    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
                    #[repr(i32)]
                    pub enum HashFunction {
                        XxHash = 0,
                        MurmurHash2 = 1,
                    }

                    impl HashFunction {
                        pub fn as_str_name(&self) -> &'static str {
                            match self {
                                Self::XxHash => "XX_HASH",
                                Self::MurmurHash2 => "MURMUR_HASH_2",
                            }
                        }
                    }
                }

                #[derive(Clone, PartialEq, ::prost::Message)]
                pub struct LeastRequestLbConfig {
                    #[prost(message, optional, tag = "1")]
                    pub choice_count: ::core::option::Option<u32>,
                }

                #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
                #[repr(i32)]
                pub enum LbPolicy {
                    RoundRobin = 0,
                    LeastRequest = 1,
                    RingHash = 2,
                    Random = 3,
                    Maglev = 5,
                    ClusterProvided = 6,
                    LoadBalancingPolicyConfig = 7,
                }

                impl LbPolicy {
                    pub fn as_str_name(&self) -> &'static str {
                        match self {
                            Self::RoundRobin => "ROUND_ROBIN",
                            Self::LeastRequest => "LEAST_REQUEST",
                            Self::RingHash => "RING_HASH",
                            Self::Random => "RANDOM",
                            Self::Maglev => "MAGLEV",
                            Self::ClusterProvided => "CLUSTER_PROVIDED",
                            Self::LoadBalancingPolicyConfig => "LOAD_BALANCING_POLICY_CONFIG",
                        }
                    }
                }

                /// Optional configuration for the load balancing algorithm selected by `lb_policy`.
                #[derive(Clone, PartialEq, ::prost::Oneof)]
                pub enum LbConfig {
                    #[prost(message, tag = "23")]
                    RingHashLbConfig(RingHashLbConfig),
                    #[prost(message, tag = "37")]
                    LeastRequestLbConfig(LeastRequestLbConfig),
                }
            }

            /// Extensible load balancing policy configuration: an ordered list of
            /// candidates, the first supported one is used.
            #[derive(Clone, PartialEq, ::prost::Message)]
            pub struct LoadBalancingPolicy {
                #[prost(message, repeated, tag = "1")]
                pub policies: ::prost::alloc::vec::Vec<load_balancing_policy::Policy>,
            }
            crate::impl_name!(LoadBalancingPolicy, "envoy.config.cluster.v3", "LoadBalancingPolicy");

            pub mod load_balancing_policy {
                #[derive(Clone, PartialEq, ::prost::Message)]
                pub struct Policy {
                    #[prost(message, optional, tag = "4")]
                    pub typed_extension_config:
                        ::core::option::Option<super::super::super::core::v3::TypedExtensionConfig>,
                }
            }
        }
    }
}

pub mod extensions {
    pub mod load_balancing_policies {
        pub mod ring_hash {
            pub mod v3 {
                #[derive(Clone, PartialEq, ::prost::Message)]
                pub struct RingHash {
                    #[prost(enumeration = "ring_hash::HashFunction", tag = "1")]
                    pub hash_function: i32,
                    #[prost(message, optional, tag = "2")]
                    pub minimum_ring_size: ::core::option::Option<u64>,
                    #[prost(message, optional, tag = "3")]
                    pub maximum_ring_size: ::core::option::Option<u64>,
                }
                crate::impl_name!(RingHash, "envoy.extensions.load_balancing_policies.ring_hash.v3", "RingHash");

                pub mod ring_hash {
                    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
                    #[repr(i32)]
                    pub enum HashFunction {
                        DefaultHash = 0,
                        XxHash = 1,
                        MurmurHash2 = 2,
                    }

                    impl HashFunction {
                        pub fn as_str_name(&self) -> &'static str {
                            match self {
                                Self::DefaultHash => "DEFAULT_HASH",
                                Self::XxHash => "XX_HASH",
                                Self::MurmurHash2 => "MURMUR_HASH_2",
                            }
                        }
                    }
                }
            }
        }

        pub mod round_robin {
            pub mod v3 {
                /// Round robin takes no configuration that orion forwards.
                #[derive(Clone, PartialEq, ::prost::Message)]
                pub struct RoundRobin {}
                crate::impl_name!(RoundRobin, "envoy.extensions.load_balancing_policies.round_robin.v3", "RoundRobin");
            }
        }

        pub mod wrr_locality {
            pub mod v3 {
                use crate::envoy::config::cluster::v3::LoadBalancingPolicy;

                #[derive(Clone, PartialEq, ::prost::Message)]
                pub struct WrrLocality {
                    #[prost(message, optional, tag = "1")]
                    pub endpoint_picking_policy: ::core::option::Option<LoadBalancingPolicy>,
                }
                crate::impl_name!(
                    WrrLocality,
                    "envoy.extensions.load_balancing_policies.wrr_locality.v3",
                    "WrrLocality"
                );
            }
        }
    }
}
