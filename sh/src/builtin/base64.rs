//
// Copyright (c) 2025 the vshell-rs authors
//
// This file is part of the vshell-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use crate::builtin::{read_inputs, BuiltinUtility, Invocation};
use crate::flags::{CommandSpec, FlagSpec};
use crate::result::{CommandError, ExecResult};
use crate::shell::Shell;
use base64::{engine::general_purpose::STANDARD, Engine as _};

pub struct Base64;

static BASE64_FLAGS: &[FlagSpec] = &[FlagSpec::boolean("decode", 'd')];

static BASE64_SPEC: CommandSpec = CommandSpec {
    name: "base64",
    summary: "encode or decode base64",
    usage: "base64 [-d] [file...]",
    flags: BASE64_FLAGS,
    root_required: false,
};

impl BuiltinUtility for Base64 {
    fn spec(&self) -> &'static CommandSpec {
        &BASE64_SPEC
    }

    fn exec(&self, inv: Invocation, shell: &mut Shell) -> ExecResult {
        let input = read_inputs(&inv.args, &inv.stdin, shell)?;
        if inv.flags.is_set("decode") {
            let bytes = STANDARD
                .decode(input.trim())
                .map_err(|err| CommandError::failed(format!("base64: invalid input: {err}")))?;
            let text = String::from_utf8(bytes)
                .map_err(|_| CommandError::failed("base64: decoded data is not valid text"))?;
            Ok(text.into())
        } else {
            Ok(STANDARD.encode(input.as_bytes()).into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::parse_flags;

    #[test]
    fn encode_decode_round_trip() {
        let mut shell = Shell::new();
        let parsed = parse_flags(&BASE64_SPEC, &[]).unwrap();
        let encoded = Base64
            .exec(
                Invocation {
                    args: parsed.args,
                    flags: parsed.flags,
                    stdin: "hello".to_string(),
                    user: "user".to_string(),
                },
                &mut shell,
            )
            .unwrap();
        assert_eq!(encoded.output, "aGVsbG8=");
        let parsed = parse_flags(&BASE64_SPEC, &["-d".to_string()]).unwrap();
        let decoded = Base64
            .exec(
                Invocation {
                    args: parsed.args,
                    flags: parsed.flags,
                    stdin: encoded.output,
                    user: "user".to_string(),
                },
                &mut shell,
            )
            .unwrap();
        assert_eq!(decoded.output, "hello");
    }
}
