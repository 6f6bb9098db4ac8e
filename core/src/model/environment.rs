/// Propagation environment with its typical path-loss exponent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Environment {
    pub label: &'static str,
    pub path_loss_exponent: f64,
}

pub const ENVIRONMENTS: &[Environment] = &[
    Environment {
        label: "Free space (ideal, unobstructed LOS)",
        path_loss_exponent: 1.0,
    },
    Environment {
        label: "Indoor (line-of-sight, corridors, open office)",
        path_loss_exponent: 1.7,
    },
    Environment {
        label: "Urban outdoor LOS",
        path_loss_exponent: 2.0,
    },
    Environment {
        label: "Indoor (non-line-of-sight, obstructed office)",
        path_loss_exponent: 3.1,
    },
    Environment {
        label: "Urban outdoor (non-line-of-sight)",
        path_loss_exponent: 4.0,
    },
    Environment {
        label: "Dense urban / urban canyon",
        path_loss_exponent: 5.0,
    },
    Environment {
        label: "Inside buildings with heavy obstructions",
        path_loss_exponent: 6.0,
    },
    Environment {
        label: "Suburban outdoor",
        path_loss_exponent: 3.0,
    },
    Environment {
        label: "Forested / foliage-dense environments",
        path_loss_exponent: 5.0,
    },
    Environment {
        label: "Underground, tunnels, heavy industrial areas",
        path_loss_exponent: 7.0,
    },
];

pub fn find_environment(label: &str) -> Option<&'static Environment> {
    ENVIRONMENTS.iter().find(|env| env.label == label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_exact_label() {
        let env = find_environment("Suburban outdoor").unwrap();
        assert_eq!(env.path_loss_exponent, 3.0);
        assert!(find_environment("suburban outdoor").is_none());
    }
}
