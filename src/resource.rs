//! Typed descriptors for server-assigned resource locations.
//!
//! The page used to carry resource URLs in markup. Here every location the
//! controller talks to is an explicit [`ResourceRef`], and every request it
//! sends is a [`ResourceDescriptor`] naming the kind, id and HTTP method.

use std::fmt;

use crate::error::OrderViewError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Delivery,
    Deliveries,
    Order,
    Orders,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// A location handed to the client by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRef {
    pub kind: ResourceKind,
    pub id: Option<u64>,
    pub url: String,
}

impl ResourceRef {
    pub fn new(kind: ResourceKind, id: Option<u64>, url: impl Into<String>) -> Self {
        Self {
            kind,
            id,
            url: url.into(),
        }
    }

    /// Builds an order reference from the `url` returned by a create request.
    pub fn order_from_url(url: &str) -> Result<Self, OrderViewError> {
        let id = url
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .and_then(|segment| segment.parse::<u64>().ok())
            .ok_or_else(|| OrderViewError::InvalidResource(url.to_string()))?;
        Ok(Self::new(ResourceKind::Order, Some(id), url))
    }

    pub fn with_method(&self, method: Method) -> ResourceDescriptor {
        ResourceDescriptor {
            kind: self.kind,
            id: self.id,
            method,
            url: self.url.clone(),
        }
    }

    pub fn get(&self) -> ResourceDescriptor {
        self.with_method(Method::Get)
    }

    pub fn post(&self) -> ResourceDescriptor {
        self.with_method(Method::Post)
    }

    pub fn put(&self) -> ResourceDescriptor {
        self.with_method(Method::Put)
    }

    pub fn delete(&self) -> ResourceDescriptor {
        self.with_method(Method::Delete)
    }
}

/// What a single back-end request targets and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDescriptor {
    pub kind: ResourceKind,
    pub id: Option<u64>,
    pub method: Method,
    pub url: String,
}

impl fmt::Display for ResourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}

/// Path prefixes of the basket API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routes {
    pub deliveries: String,
    pub orders: String,
}

impl Default for Routes {
    fn default() -> Self {
        Self {
            deliveries: "/deliveries".to_string(),
            orders: "/orders".to_string(),
        }
    }
}

impl Routes {
    pub fn delivery(&self, id: u64) -> ResourceRef {
        ResourceRef::new(ResourceKind::Delivery, Some(id), format!("{}/{}", self.deliveries, id))
    }

    pub fn order(&self, id: u64) -> ResourceRef {
        ResourceRef::new(ResourceKind::Order, Some(id), format!("{}/{}", self.orders, id))
    }

    pub fn deliveries(&self) -> ResourceRef {
        ResourceRef::new(ResourceKind::Deliveries, None, self.deliveries.clone())
    }

    /// Collection used both to list orders and to create one.
    pub fn orders(&self) -> ResourceRef {
        ResourceRef::new(ResourceKind::Orders, None, self.orders.clone())
    }
}
