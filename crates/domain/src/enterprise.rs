//! Enterprise entity.

use common::EnterpriseId;
use serde::{Deserialize, Serialize};

/// A carrier enterprise that fulfills shipments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enterprise {
    pub id: EnterpriseId,
    pub name: String,
    pub email: String,
}

/// Enterprise fields supplied at creation time; identity is assigned by
/// the repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEnterprise {
    pub name: String,
    pub email: String,
}

impl NewEnterprise {
    /// Attaches a repository-assigned identity, producing the stored entity.
    pub fn into_enterprise(self, id: EnterpriseId) -> Enterprise {
        Enterprise {
            id,
            name: self.name,
            email: self.email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_enterprise_preserves_fields() {
        let new = NewEnterprise {
            name: "Northwind Freight".to_string(),
            email: "dispatch@northwind.test".to_string(),
        };
        let enterprise = new.into_enterprise(EnterpriseId::new(7));

        assert_eq!(enterprise.id, EnterpriseId::new(7));
        assert_eq!(enterprise.name, "Northwind Freight");
        assert_eq!(enterprise.email, "dispatch@northwind.test");
    }
}
