use quickcheck::{Arbitrary, Gen};

use crate::domain::role::Role;

impl Arbitrary for Role {
    fn arbitrary(g: &mut Gen) -> Self {
        *g.choose(&Role::ALL).expect("role list is not empty")
    }
}
