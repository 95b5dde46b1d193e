#![no_main]

use commitment_tree::{
    hash::{Rpo, RpoDigest},
    merkle::{InclusionProof, NodeIndex},
    utils::{Deserializable, Serializable},
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Proof deserialization: depth prefix, digest validation, position bounds
    if let Ok(proof) = InclusionProof::<RpoDigest>::read_from_bytes(data) {
        assert!(proof.depth() == 64 || proof.position() >> proof.depth() == 0);
        assert_eq!(proof.directions().len(), proof.siblings().len());
        let _ = proof.verify(&Rpo::new(), proof.root());
        let _ = proof.to_bytes();
    }

    let _ = Vec::<InclusionProof<RpoDigest>>::read_from_bytes(data);
    let _ = NodeIndex::read_from_bytes(data);
});
