// SPDX-FileCopyrightText: 2026 Artifex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `providers` subcommand: list supported back ends and their models.

use strum::IntoEnumIterator;

use artifex_core::ProviderKind;

pub fn run() {
    for kind in ProviderKind::iter() {
        println!("{kind}");
        println!("  default model:    {}", kind.default_model());
        println!("  max references:   {}", kind.max_reference_images());
        println!("  supported models:");
        for model in kind.supported_models() {
            println!("    {model}");
        }
        println!();
    }
}
