//! Text for `tsfix explain` and `tsfix list-fixes`.

use tsfix_domain::{FixSafety, FixerMeta, builtin_fixer_metas};

pub fn list_fix_keys() -> Vec<&'static str> {
    builtin_fixer_metas().iter().map(|m| m.key).collect()
}

pub fn format_safety(safety: FixSafety) -> &'static str {
    match safety {
        FixSafety::Safe => "Safe",
        FixSafety::Guarded => "Guarded",
        FixSafety::Manual => "Manual",
    }
}

pub fn safety_meaning(safety: FixSafety) -> &'static str {
    match safety {
        FixSafety::Safe => {
            "The rewrite is purely syntactic. Runtime behavior does not change, so it is applied \
             whenever the diagnostic appears."
        }
        FixSafety::Guarded => {
            "The rewrite is right for the common case but can drop a side effect or pick a name \
             that is already taken. It is applied automatically; review the patch in the session \
             cache."
        }
        FixSafety::Manual => {
            "No rewrite is attempted. The diagnostic is reported as unresolved and needs a human \
             decision."
        }
    }
}

pub fn render_explanation(meta: &FixerMeta) -> String {
    const RULE: &str =
        "================================================================================";
    const SUB: &str =
        "--------------------------------------------------------------------------------";
    let mut out = String::new();
    out.push_str(&format!("{RULE}\nFIX: {}\n{RULE}\n\n", meta.title));
    out.push_str(&format!("Key:     {}\n", meta.key));
    let codes: Vec<String> = meta.codes.iter().map(|c| format!("TS{c}")).collect();
    out.push_str(&format!("Codes:   {}\n", codes.join(", ")));
    out.push_str(&format!("Safety:  {}\n\n", format_safety(meta.safety)));

    out.push_str(&format!("DESCRIPTION\n{SUB}\n{}\n\n", meta.description));
    out.push_str(&format!(
        "SAFETY CLASS: {}\n{SUB}\n{}\n\n",
        format_safety(meta.safety),
        safety_meaning(meta.safety)
    ));
    out.push_str(&format!("REMEDIATION GUIDANCE\n{SUB}\n{}\n", meta.remediation));
    out
}
