//! Disassembly adapter boundary
//!
//! The decompilation engine is an external collaborator: the core only
//! sees a binary path going in and a map of named pseudo-source bodies
//! coming out. Adapters must recover internally from analysis failures
//! and return a best-effort (possibly empty) mapping; an empty map means
//! "zero functions found", not an error.

use crate::error::BinliftError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use uuid::Uuid;

/// One function recovered by the disassembler, with the structural
/// metadata the classifier needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoveredFunction {
    /// Machine-generated pseudo-C body.
    pub code: String,
    /// External linkage (imported symbol).
    pub is_external: bool,
    /// Thunk/trampoline with no body of its own.
    pub is_thunk: bool,
    /// Size of the function in the binary, in bytes.
    pub byte_size: u64,
}

impl RecoveredFunction {
    pub fn new(code: impl Into<String>, byte_size: u64) -> Self {
        Self {
            code: code.into(),
            is_external: false,
            is_thunk: false,
            byte_size,
        }
    }
}

/// Recovered functions keyed by name. Name collisions overwrite.
pub type RecoveredMap = BTreeMap<String, RecoveredFunction>;

/// Boundary with the disassembly/decompilation engine.
#[async_trait]
pub trait Disassembler: Send + Sync {
    /// Analyze a binary and return pseudo-source per recovered function.
    async fn disassemble(
        &self,
        binary_path: &Path,
        job_token: Uuid,
    ) -> Result<RecoveredMap, BinliftError>;
}

/// Deterministic stand-in used when no engine is configured, and in tests.
/// The bodies mimic real decompiler output: placeholder types, synthetic
/// variable names, goto-based control flow.
pub struct MockDisassembler;

#[async_trait]
impl Disassembler for MockDisassembler {
    async fn disassemble(
        &self,
        binary_path: &Path,
        _job_token: Uuid,
    ) -> Result<RecoveredMap, BinliftError> {
        let filename = binary_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unknown".to_string());

        let mut functions = RecoveredMap::new();
        functions.insert(
            "main".to_string(),
            RecoveredFunction::new(
                format!(
                    r#"int main(int argc, char **argv)
{{
    int iVar1;
    undefined8 uVar2;
    char *pcVar3;
    long lVar4;

    // Binary: {filename}
    iVar1 = 0;
    if (argc < 2) {{
        pcVar3 = "Usage: %s <input>\n";
        goto LAB_00401050;
    }}

    uVar2 = FUN_00401100(argv[1]);
    if ((int)uVar2 == 0) {{
        pcVar3 = "Error processing input\n";
LAB_00401050:
        printf(pcVar3, *argv);
        iVar1 = 1;
    }}
    else {{
        lVar4 = FUN_00401200((long)uVar2);
        printf("Result: %ld\n", lVar4);
    }}

    return iVar1;
}}"#
                ),
                212,
            ),
        );
        functions.insert(
            "FUN_00401100".to_string(),
            RecoveredFunction::new(
                r#"undefined8 FUN_00401100(char *param_1)
{
    size_t sVar1;
    void *pvVar2;
    undefined8 uVar3;

    sVar1 = strlen(param_1);
    if (sVar1 == 0) {
        uVar3 = 0;
    }
    else {
        pvVar2 = malloc(sVar1 + 1);
        if (pvVar2 == (void *)0x0) {
            uVar3 = 0;
        }
        else {
            strcpy((char *)pvVar2, param_1);
            uVar3 = (undefined8)pvVar2;
        }
    }
    return uVar3;
}"#,
                96,
            ),
        );
        functions.insert(
            "FUN_00401200".to_string(),
            RecoveredFunction::new(
                r#"long FUN_00401200(long param_1)
{
    long lVar1;
    int iVar2;
    long lVar3;

    lVar1 = 0;
    if (param_1 != 0) {
        lVar3 = 0;
        do {
            iVar2 = *(int *)(param_1 + lVar3 * 4);
            lVar1 = lVar1 + (long)iVar2;
            lVar3 = lVar3 + 1;
        } while (lVar3 < 10);
    }
    return lVar1;
}"#,
                80,
            ),
        );
        functions.insert(
            "FUN_00401300".to_string(),
            RecoveredFunction::new(
                r#"void FUN_00401300(void *param_1, int param_2)
{
    int iVar1;
    int iVar2;
    void *pvVar3;

    if ((param_1 != (void *)0x0) && (param_2 != 0)) {
        iVar1 = 0;
        while (iVar1 < param_2) {
            pvVar3 = (void *)((long)param_1 + (long)iVar1);
            iVar2 = iVar1 + 1;
            *(undefined *)pvVar3 = 0;
            iVar1 = iVar2;
        }
    }
    return;
}"#,
                64,
            ),
        );

        Ok(functions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_disassembler_yields_main() {
        let map = MockDisassembler
            .disassemble(Path::new("/tmp/sample.exe"), Uuid::new_v4())
            .await
            .unwrap();

        assert!(map.contains_key("main"));
        assert!(map.len() > 1);
        assert!(map["main"].code.contains("sample.exe"));
        assert!(!map["main"].is_external);
    }
}
