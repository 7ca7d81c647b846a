use anyhow::Result;
use pretty_assertions::assert_eq;

use crate::{CliTest, stderr, stdout};

#[test]
fn test_list_definitions() -> Result<()> {
    let test = CliTest::with_file(
        "staging/oper/bgp_nbr.proto",
        "package bgp.nbr;\n\nmessage bgp_nbr_KEYS {\n}\n",
    )?;
    test.write_file("staging/plain.proto", "package plain;\n")?;

    let output = test.command().arg("list").output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    assert_eq!(
        stdout(&output),
        "staging/oper/bgp_nbr.proto  bgp_nbr  BgpNbr_KEYS BgpNbr\n\
         staging/plain.proto  plain  (no key message)\n\
         2 proto files, 1 with plugin symbols\n"
    );
    // Listing writes nothing.
    assert!(!test.root().join("proto_go").exists());

    Ok(())
}
