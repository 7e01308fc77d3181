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

use super::{
    builders::{custom_config, ring_hash_config, round_robin_config, wrr_locality_config, LbPolicyConfig},
    converter::LoadBalancingPolicyConverter,
};
use crate::{error::WithNodeOnResult, LbConfigError};
use compact_str::CompactString;
use orion_data_plane_api::{
    decode::decode_any_type,
    envoy::extensions::load_balancing_policies::{
        ring_hash::v3::{ring_hash::HashFunction, RingHash},
        round_robin::v3::RoundRobin,
        wrr_locality::v3::WrrLocality,
    },
    google::protobuf::{value::Kind, Any, Struct, Value as ProtoValue},
    prost::{Message, Name},
    udpa, xds,
};
use serde_json::{Map, Number, Value};
use std::{collections::HashMap, fmt::Debug, sync::Arc};

/// Converts the typed config of one policy candidate into its canonical config.
///
/// A decoder is selected by the type url of the candidate's `Any`. Errors returned
/// from a decoder are fatal for the whole conversion, a candidate is only skipped
/// when no decoder matches or the resulting policy is not registered.
pub trait PolicyDecoder: Send + Sync {
    fn convert(
        &self,
        typed_config: &Any,
        converter: &LoadBalancingPolicyConverter<'_>,
        depth: usize,
    ) -> Result<LbPolicyConfig, LbConfigError>;
}

impl<F> PolicyDecoder for F
where
    F: Fn(&Any, &LoadBalancingPolicyConverter<'_>, usize) -> Result<LbPolicyConfig, LbConfigError> + Send + Sync,
{
    fn convert(
        &self,
        typed_config: &Any,
        converter: &LoadBalancingPolicyConverter<'_>,
        depth: usize,
    ) -> Result<LbPolicyConfig, LbConfigError> {
        self(typed_config, converter, depth)
    }
}

/// Dispatch table from message type to decoder.
///
/// Entries are keyed by the full protobuf name of the message. A type url matches an
/// entry through the part after its last `/`, whatever the prefix before it.
#[derive(Clone)]
pub struct PolicyDecoders {
    decoders: HashMap<CompactString, Arc<dyn PolicyDecoder>>,
}

impl Debug for PolicyDecoders {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.decoders.keys()).finish()
    }
}

impl Default for PolicyDecoders {
    fn default() -> Self {
        Self::empty()
            .with_decoder(RingHash::full_name(), RingHashDecoder)
            .with_decoder(WrrLocality::full_name(), WrrLocalityDecoder)
            .with_decoder(RoundRobin::full_name(), RoundRobinDecoder)
            .with_decoder(xds::r#type::v3::TypedStruct::full_name(), TypedStructDecoder)
            .with_decoder(udpa::r#type::v1::TypedStruct::full_name(), TypedStructDecoder)
    }
}

impl PolicyDecoders {
    pub fn empty() -> Self {
        Self { decoders: HashMap::new() }
    }

    /// Registers `decoder` for a message type, given either as its full name or as a
    /// type url. Returns the decoder it replaces.
    pub fn register<T, D>(&mut self, type_name: T, decoder: D) -> Option<Arc<dyn PolicyDecoder>>
    where
        T: AsRef<str>,
        D: PolicyDecoder + 'static,
    {
        let type_name = type_name.as_ref();
        let type_name = type_name.rsplit_once('/').map_or(type_name, |(_, name)| name);
        self.decoders.insert(type_name.into(), Arc::new(decoder))
    }

    #[must_use]
    pub fn with_decoder<T, D>(mut self, type_name: T, decoder: D) -> Self
    where
        T: AsRef<str>,
        D: PolicyDecoder + 'static,
    {
        self.register(type_name, decoder);
        self
    }

    /// Looks up the decoder for the type url of an `Any`. A url without a `/` names
    /// no type and never matches.
    pub fn get(&self, type_url: &str) -> Option<&dyn PolicyDecoder> {
        let (_, type_name) = type_url.rsplit_once('/')?;
        Some(self.decoders.get(type_name)?.as_ref())
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.decoders.keys().map(CompactString::as_str)
    }
}

fn unpack<T: Message + Default>(typed_config: &Any, desc: &'static str) -> Result<T, LbConfigError> {
    decode_any_type(typed_config, desc).map_err(|e| LbConfigError::payload_decode(typed_config.type_url.clone(), e))
}

#[derive(Debug, Clone, Copy)]
pub struct RingHashDecoder;

impl PolicyDecoder for RingHashDecoder {
    fn convert(
        &self,
        typed_config: &Any,
        _converter: &LoadBalancingPolicyConverter<'_>,
        _depth: usize,
    ) -> Result<LbPolicyConfig, LbConfigError> {
        let RingHash { hash_function, minimum_ring_size, maximum_ring_size } = unpack(typed_config, "RingHash")?;
        // the hash function is not part of the resulting config, so it can't be validated later on
        match HashFunction::try_from(hash_function) {
            Ok(HashFunction::XxHash) => Ok(ring_hash_config(minimum_ring_size, maximum_ring_size)),
            Ok(other) => Err(LbConfigError::UnsupportedHashFunction(other.as_str_name().into())),
            Err(_) => Err(LbConfigError::UnsupportedHashFunction(format!("[unknown HashFunction {hash_function}]").into())),
        }
        .with_node("hash_function")
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RoundRobinDecoder;

impl PolicyDecoder for RoundRobinDecoder {
    fn convert(
        &self,
        typed_config: &Any,
        _converter: &LoadBalancingPolicyConverter<'_>,
        _depth: usize,
    ) -> Result<LbPolicyConfig, LbConfigError> {
        let RoundRobin {} = unpack(typed_config, "RoundRobin")?;
        Ok(round_robin_config())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct WrrLocalityDecoder;

impl PolicyDecoder for WrrLocalityDecoder {
    fn convert(
        &self,
        typed_config: &Any,
        converter: &LoadBalancingPolicyConverter<'_>,
        depth: usize,
    ) -> Result<LbPolicyConfig, LbConfigError> {
        let WrrLocality { endpoint_picking_policy } = unpack(typed_config, "WrrLocality")?;
        let child_policy = converter
            .convert_policy(&endpoint_picking_policy.unwrap_or_default(), depth + 1)
            .with_node("endpoint_picking_policy")?;
        Ok(wrr_locality_config(child_policy))
    }
}

/// Custom policies configured through a `TypedStruct`, the policy name is taken from
/// the struct's own type url and its value becomes the policy parameters.
#[derive(Debug, Clone, Copy)]
pub struct TypedStructDecoder;

impl PolicyDecoder for TypedStructDecoder {
    fn convert(
        &self,
        typed_config: &Any,
        _converter: &LoadBalancingPolicyConverter<'_>,
        _depth: usize,
    ) -> Result<LbPolicyConfig, LbConfigError> {
        // udpa.type.v1.TypedStruct has the same layout
        let xds::r#type::v3::TypedStruct { type_url, value } = unpack(typed_config, "TypedStruct")?;
        let value = match value {
            Some(value) => struct_to_json(&value, &type_url)?,
            None => Value::Object(Map::new()),
        };
        custom_config(&type_url, value)
    }
}

// 2^53, the largest magnitude up to which every integer is exactly representable as f64
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

fn struct_to_json(value: &Struct, type_url: &str) -> Result<Value, LbConfigError> {
    value
        .fields
        .iter()
        .map(|(key, value)| Ok((key.clone(), value_to_json(value, type_url)?)))
        .collect::<Result<Map<_, _>, LbConfigError>>()
        .map(Value::Object)
}

fn value_to_json(value: &ProtoValue, type_url: &str) -> Result<Value, LbConfigError> {
    Ok(match &value.kind {
        None | Some(Kind::NullValue(_)) => Value::Null,
        Some(Kind::BoolValue(value)) => Value::Bool(*value),
        Some(Kind::StringValue(value)) => Value::String(value.clone()),
        Some(Kind::NumberValue(value)) => number_to_json(*value, type_url)?,
        Some(Kind::StructValue(value)) => struct_to_json(value, type_url)?,
        Some(Kind::ListValue(list)) => {
            Value::Array(list.values.iter().map(|value| value_to_json(value, type_url)).collect::<Result<_, _>>()?)
        },
    })
}

fn number_to_json(value: f64, type_url: &str) -> Result<Value, LbConfigError> {
    if value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
        return Ok(Value::from(value as i64));
    }
    Number::from_f64(value)
        .map(Value::Number)
        .ok_or_else(|| LbConfigError::InvalidCustomConfig(type_url.to_owned().into(), "contains a non-finite number"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lb_policy::registry::StaticLbPolicyRegistry, ErrorKind};
    use orion_data_plane_api::google::protobuf::ListValue;
    use serde_json::json;

    fn number(value: f64) -> ProtoValue {
        ProtoValue { kind: Some(Kind::NumberValue(value)) }
    }

    fn convert(typed_config: &Any) -> Result<LbPolicyConfig, LbConfigError> {
        let registry = StaticLbPolicyRegistry::with_builtin_policies();
        let decoders = PolicyDecoders::default();
        let converter = LoadBalancingPolicyConverter::new(&registry, &decoders);
        let decoder = decoders.get(&typed_config.type_url).expect("decoder should be registered");
        decoder.convert(typed_config, &converter, 0)
    }

    #[test]
    fn default_table_knows_builtin_types() {
        let decoders = PolicyDecoders::default();
        assert_eq!(decoders.type_names().count(), 5);
        assert!(decoders.get("type.googleapis.com/envoy.extensions.load_balancing_policies.round_robin.v3.RoundRobin").is_some());
        assert!(decoders.get("type.googleapis.com/udpa.type.v1.TypedStruct").is_some());
        assert!(decoders.type_names().any(|name| name == "xds.type.v3.TypedStruct"));
        assert!(decoders
            .get("type.googleapis.com/envoy.extensions.load_balancing_policies.least_request.v3.LeastRequest")
            .is_none());
    }

    #[test]
    fn ring_hash_hash_functions() {
        let ring_hash = |hash_function: i32| {
            Any::from_msg(&RingHash { hash_function, minimum_ring_size: Some(10), maximum_ring_size: None }).unwrap()
        };

        let config = convert(&ring_hash(HashFunction::XxHash as i32)).unwrap();
        assert_eq!(config.to_json(), json!({"ring_hash": {"minRingSize": 10}}));

        for hash_function in [HashFunction::DefaultHash as i32, HashFunction::MurmurHash2 as i32, 42] {
            let err = convert(&ring_hash(hash_function)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::UnsupportedHashFunction);
        }
    }

    #[test]
    fn undecodable_payload() {
        let any = Any { type_url: RingHash::type_url(), value: vec![0x0a] };
        let err = convert(&any).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PayloadDecode);
        assert!(err.to_string().contains("RingHash"));
    }

    #[test]
    fn typed_struct_to_json() {
        let value = Struct {
            fields: [
                ("int".to_owned(), number(3.0)),
                ("float".to_owned(), number(0.5)),
                ("name".to_owned(), ProtoValue { kind: Some(Kind::StringValue("a".to_owned())) }),
                ("none".to_owned(), ProtoValue { kind: None }),
                (
                    "list".to_owned(),
                    ProtoValue {
                        kind: Some(Kind::ListValue(ListValue {
                            values: vec![ProtoValue { kind: Some(Kind::BoolValue(true)) }, number(-1.0)],
                        })),
                    },
                ),
            ]
            .into_iter()
            .collect(),
        };
        let typed_struct = xds::r#type::v3::TypedStruct {
            type_url: "type.googleapis.com/test.myorg.MyPolicy".to_owned(),
            value: Some(value),
        };
        let config = convert(&Any::from_msg(&typed_struct).unwrap()).unwrap();
        assert_eq!(
            config.to_json(),
            json!({"test.myorg.MyPolicy": {"int": 3, "float": 0.5, "name": "a", "none": null, "list": [true, -1]}})
        );
    }

    #[test]
    fn udpa_typed_struct_without_value() {
        let typed_struct = udpa::r#type::v1::TypedStruct { type_url: "myPolicy".to_owned(), value: None };
        let config = convert(&Any::from_msg(&typed_struct).unwrap()).unwrap();
        assert_eq!(config.to_json(), json!({"myPolicy": {}}));
    }

    #[test]
    fn typed_struct_non_finite_number() {
        let typed_struct = xds::r#type::v3::TypedStruct {
            type_url: "type.googleapis.com/myPolicy".to_owned(),
            value: Some(Struct { fields: [("x".to_owned(), number(f64::NAN))].into_iter().collect() }),
        };
        let err = convert(&Any::from_msg(&typed_struct).unwrap()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PayloadDecode);
    }

    fn pick_first(
        _: &Any,
        _: &LoadBalancingPolicyConverter<'_>,
        _: usize,
    ) -> Result<LbPolicyConfig, LbConfigError> {
        Ok(LbPolicyConfig::new("pick_first", Map::new()))
    }

    #[test]
    fn registering_replaces_decoder() {
        let mut decoders = PolicyDecoders::default();
        let replaced = decoders.register(RoundRobin::type_url(), pick_first);
        assert!(replaced.is_some());
        assert_eq!(decoders.type_names().count(), 5);

        let replaced = decoders.register("test.PickFirst", pick_first);
        assert!(replaced.is_none());
        assert!(decoders.get("type.googleapis.com/test.PickFirst").is_some());
    }

    #[test]
    fn lookup_ignores_the_url_prefix() {
        let decoders = PolicyDecoders::default();
        for type_url in [
            "type.googleapis.com/envoy.extensions.load_balancing_policies.ring_hash.v3.RingHash",
            "xds.example.com/envoy.extensions.load_balancing_policies.ring_hash.v3.RingHash",
            "example.com/some/path/envoy.extensions.load_balancing_policies.ring_hash.v3.RingHash",
            "/envoy.extensions.load_balancing_policies.ring_hash.v3.RingHash",
        ] {
            assert!(decoders.get(type_url).is_some(), "{type_url}");
        }

        assert!(decoders.get("envoy.extensions.load_balancing_policies.ring_hash.v3.RingHash").is_none());
        assert!(decoders.get("type.googleapis.com/").is_none());
        assert!(decoders.get("type.googleapis.com/envoy.extensions.load_balancing_policies.ring_hash.v3").is_none());
    }
}
