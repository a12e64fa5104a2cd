//! Customer entity.

use common::CustomerId;
use serde::{Deserialize, Serialize};

/// A customer that shipments can be addressed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub email: String,
}

/// Customer fields supplied at creation time; identity is assigned by
/// the repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
}

impl NewCustomer {
    /// Attaches a repository-assigned identity, producing the stored entity.
    pub fn into_customer(self, id: CustomerId) -> Customer {
        Customer {
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
    fn test_into_customer_preserves_fields() {
        let new = NewCustomer {
            name: "Acme Logistics".to_string(),
            email: "ops@acme.test".to_string(),
        };
        let customer = new.into_customer(CustomerId::new(3));

        assert_eq!(customer.id, CustomerId::new(3));
        assert_eq!(customer.name, "Acme Logistics");
        assert_eq!(customer.email, "ops@acme.test");
    }
}
