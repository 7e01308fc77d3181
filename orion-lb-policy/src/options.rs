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

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(about = "Resolves the load balancing policy config of an Envoy cluster")]
pub struct Options {
    #[arg(help = "Configuration file", short = 'c', long = "config")]
    pub config: Option<PathBuf>,
    #[arg(help = "Binary protobuf encoded envoy.config.cluster.v3.Cluster", long = "cluster")]
    pub cluster: PathBuf,
    #[arg(help = "Accept the legacy LEAST_REQUEST lb policy", long = "enable-least-request")]
    pub enable_least_request: bool,
    #[arg(
        help = "Comma delimited list of the policies available for instantiation",
        long = "registered-policies",
        num_args = 1..,
        value_delimiter = ',',
    )]
    pub registered_policies: Option<Vec<String>>,
    #[arg(help = "Pretty print the resulting JSON", long = "pretty")]
    pub pretty: bool,
}

impl Options {
    pub fn parse_options() -> Self {
        Options::parse()
    }

    pub fn from_cluster_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config: None,
            cluster: path.into(),
            enable_least_request: false,
            registered_policies: None,
            pretty: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Options;
    use clap::Parser;

    #[test]
    fn parse_arguments() {
        let opt = Options::try_parse_from([
            "orion-lb-tool",
            "-c",
            "orion.yaml",
            "--cluster",
            "cluster.pb",
            "--enable-least-request",
            "--registered-policies",
            "round_robin,ring_hash",
        ])
        .unwrap();
        assert_eq!(opt.config.as_deref(), Some(std::path::Path::new("orion.yaml")));
        assert!(opt.enable_least_request);
        assert!(!opt.pretty);
        assert_eq!(opt.registered_policies, Some(vec!["round_robin".to_owned(), "ring_hash".to_owned()]));
    }

    #[test]
    fn cluster_is_required() {
        assert!(Options::try_parse_from(["orion-lb-tool"]).is_err());
    }
}
