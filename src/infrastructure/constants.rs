// Copyright 2025 JiangLong.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::net::Ipv4Addr;

/// Address allocator seeds
pub const DEFAULT_VNODE_IP: Ipv4Addr = Ipv4Addr::new(10, 1, 1, 1);
pub const DEFAULT_NODE_IP: Ipv4Addr = Ipv4Addr::new(200, 1, 1, 1);

/// Input and output line format
pub const COMMENT_PREFIX: char = '#';
pub const FIELD_SEPARATOR: &str = ", ";

/// Process exit codes
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_RECORDS_SKIPPED: u8 = 3;
pub const EXIT_ADDRESS_EXHAUSTED: u8 = 4;

/// Section headers for the grouped output layout
pub const CONTAINER_SECTION: &str = "#1. define containers, container format:\n\
# container, <containerId>, <limitCPU>, <usedCPU>, <reqCPU>, <limitMem>, <usedMem>, <reqMem>, <limitQPS>, <usedQPS>";
pub const POD_SECTION: &str = "#2. define pods, pod format:\n\
# pod, <podId>, <containerId1>, <containerId2>, ...";
pub const VNODE_SECTION: &str = "#3. define virtual machines (vnode), vnode format:\n\
# vnode, <vnodeId>, <cpuCapacity>, <memCapacity>, <IP>, <podId1>, <podId2>, ...";
pub const NODE_SECTION: &str = "#4. define physical machines (node), node format:\n\
# node, <nodeId>, <cpuCapacity>, <memCapacity>, <IP>, <vnodeId1>, <vnodeId2>, ...";
