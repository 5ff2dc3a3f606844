use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Total price of all subscriptions overlapping a period.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TotalCost {
    pub total_cost: i64,
}
