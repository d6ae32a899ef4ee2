/// Two Mach points by three angles of attack (0, 0.1 and 0.2 rad).
pub const TEST_TABLE_JSON: &str = r#"{
    "mach": [0.2, 0.6],
    "aoa": [0.0, 0.1, 0.2],
    "cn_alpha": [[10.0, 11.0, 12.0], [10.5, 11.5, 12.5]],
    "cp_x": [[0.60, 0.62, 0.64], [0.66, 0.68, 0.70]],
    "friction_cd": [[0.30, 0.31, 0.32], [0.26, 0.27, 0.28]],
    "pressure_cd": [[0.10, 0.11, 0.12], [0.12, 0.13, 0.14]],
    "base_cd": [[0.12, 0.12, 0.12], [0.17, 0.17, 0.17]]
}"#;

pub const TEST_TABLE_YAML: &str = "\
mach: [0.2, 0.6]
aoa: [0.0, 0.1, 0.2]
cn_alpha:
  - [10.0, 11.0, 12.0]
  - [10.5, 11.5, 12.5]
cp_x:
  - [0.60, 0.62, 0.64]
  - [0.66, 0.68, 0.70]
c_roll:
  - [0.0, 0.01, 0.02]
  - [0.0, 0.02, 0.04]
";
