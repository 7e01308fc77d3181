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

use std::{
    borrow::Cow,
    error::Error,
    fmt::{Debug, Display},
};

enum TraceNode {
    Field(Cow<'static, str>),
    Name(Cow<'static, str>),
    Index(usize),
}

impl Display for TraceNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TraceNode::Field(field) => f.write_str(field),
            TraceNode::Name(name) => write!(f, "[\"{name}\"]"),
            TraceNode::Index(index) => write!(f, "[{index}]"),
        }
    }
}

/// Path from the cluster down to the offending field, stored innermost first.
pub struct FieldTrace {
    vec: Vec<TraceNode>,
}

impl Display for FieldTrace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut iter = self.vec.iter().rev();
        if let Some(first) = iter.next() {
            first.fmt(f)?;
        }
        for node in iter {
            match node {
                TraceNode::Field(_) => write!(f, " / {node}")?,
                TraceNode::Name(_) | TraceNode::Index(_) => write!(f, " {node}")?,
            }
        }
        Ok(())
    }
}

impl Debug for FieldTrace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl FieldTrace {
    fn new() -> Self {
        Self { vec: Vec::new() }
    }

    fn push(&mut self, value: TraceNode) {
        self.vec.push(value);
    }
}

/// The failure classes a conversion can end in. All of them mean the cluster's
/// load balancing configuration is invalid and must be rejected as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A ring hash policy asked for a hash function other than xxHash.
    UnsupportedHashFunction,
    /// `wrr_locality` policies were nested deeper than the converter allows.
    RecursionExceeded,
    /// A typed config could not be decoded as the type its url announces,
    /// or a custom policy payload was not a JSON object.
    PayloadDecode,
    /// No candidate of a policy list could be converted into a registered policy.
    NoSupportedPolicy,
    /// The legacy `lb_policy` selector names a policy that cannot be used.
    UnsupportedLbPolicy,
}

#[derive(thiserror::Error, Debug)]
pub enum LbConfigError {
    #[error("Error converting field {0}")]
    TracedError(FieldTrace, #[source] Box<Self>),
    #[error("invalid ring hash function: {0}")]
    UnsupportedHashFunction(Cow<'static, str>),
    #[error("maximum lb config recursion depth of {0} reached")]
    RecursionExceeded(usize),
    #[error("unable to unpack typed config for \"{0}\"")]
    PayloadDecode(Cow<'static, str>, #[source] Box<dyn Error + Send + Sync + 'static>),
    #[error("custom lb config \"{0}\" {1}")]
    InvalidCustomConfig(Cow<'static, str>, &'static str),
    #[error("invalid load balancing policy, none of [{0}] is supported")]
    NoSupportedPolicy(Cow<'static, str>),
    #[error("Cluster {0}: unsupported lb policy: {1}")]
    UnsupportedLbPolicy(Cow<'static, str>, Cow<'static, str>),
}

impl LbConfigError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::TracedError(_, inner) => inner.kind(),
            Self::UnsupportedHashFunction(_) => ErrorKind::UnsupportedHashFunction,
            Self::RecursionExceeded(_) => ErrorKind::RecursionExceeded,
            Self::PayloadDecode(..) | Self::InvalidCustomConfig(..) => ErrorKind::PayloadDecode,
            Self::NoSupportedPolicy(_) => ErrorKind::NoSupportedPolicy,
            Self::UnsupportedLbPolicy(..) => ErrorKind::UnsupportedLbPolicy,
        }
    }

    /// Every conversion failure rejects the cluster resource.
    pub fn is_config_invalid(&self) -> bool {
        true
    }

    /// The error without the field trace wrapped around it.
    pub fn root(&self) -> &Self {
        match self {
            Self::TracedError(_, inner) => inner.root(),
            other => other,
        }
    }

    #[must_use]
    pub(crate) fn with_node<T: Into<Cow<'static, str>>>(self, node: T) -> Self {
        self.with_trace_node(TraceNode::Field(node.into()))
    }

    #[must_use]
    pub(crate) fn with_index(self, index: usize) -> Self {
        self.with_trace_node(TraceNode::Index(index))
    }

    #[must_use]
    pub(crate) fn with_name<T: Into<Cow<'static, str>>>(self, name: T) -> Self {
        self.with_trace_node(TraceNode::Name(name.into()))
    }

    #[must_use]
    fn with_trace_node(self, node: TraceNode) -> Self {
        match self {
            Self::TracedError(mut fields, error) => {
                fields.push(node);
                Self::TracedError(fields, error)
            },
            other => {
                let mut fields = FieldTrace::new();
                fields.push(node);
                Self::TracedError(fields, other.into())
            },
        }
    }

    pub fn payload_decode<T, E>(type_url: T, cause: E) -> Self
    where
        T: Into<Cow<'static, str>>,
        E: Into<Box<dyn Error + Send + Sync + 'static>>,
    {
        Self::PayloadDecode(type_url.into(), cause.into())
    }
}

pub(crate) trait WithNodeOnResult {
    fn with_node<T: Into<Cow<'static, str>>>(self, node: T) -> Self;
    fn with_index(self, index: usize) -> Self;
    fn with_name<T: Into<Cow<'static, str>>>(self, name: T) -> Self;
}

impl<T> WithNodeOnResult for Result<T, LbConfigError> {
    fn with_node<Node: Into<Cow<'static, str>>>(self, node: Node) -> Self {
        self.map_err(|e| e.with_node(node))
    }

    fn with_index(self, index: usize) -> Self {
        self.map_err(|e| e.with_index(index))
    }

    fn with_name<Node: Into<Cow<'static, str>>>(self, name: Node) -> Self {
        self.map_err(|e| e.with_name(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_is_printed_outermost_first() {
        let err = LbConfigError::RecursionExceeded(16)
            .with_node("endpoint_picking_policy")
            .with_index(1)
            .with_node("policies")
            .with_node("load_balancing_policy")
            .with_name("cluster-a");
        assert_eq!(
            err.to_string(),
            "Error converting field [\"cluster-a\"] / load_balancing_policy / policies [1] / endpoint_picking_policy"
        );
        assert_eq!(err.kind(), ErrorKind::RecursionExceeded);
        assert!(matches!(err.root(), LbConfigError::RecursionExceeded(16)));
    }

    #[test]
    fn untraced_error_keeps_its_message() {
        let err = LbConfigError::UnsupportedLbPolicy("cluster-a".into(), "MAGLEV".into());
        assert_eq!(err.to_string(), "Cluster cluster-a: unsupported lb policy: MAGLEV");
        assert_eq!(err.kind(), ErrorKind::UnsupportedLbPolicy);
        assert!(err.is_config_invalid());
    }
}
