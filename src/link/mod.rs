// Copyright 2026 Blueterm Contributors
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

//! Serial link over classic Bluetooth RFCOMM.
//!
//! Outgoing connections to a bonded SPP peripheral, a chunked read loop,
//! and a write handle for user commands.

mod client;
mod sender;
mod session;

pub use client::{adapter_notice, connect_and_run, find_bonded_device, BondedDevice, SPP_UUID};
pub use sender::CommandSender;
pub use session::{LinkEvent, LinkSession, READ_BUF_SIZE};
