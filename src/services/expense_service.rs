use crate::models::expense::Expense;
use crate::models::trip::Trip;

/// Append `expense` and grow the running total.
pub fn add_expense(trip: &Trip, expense: Expense) -> Trip {
    let mut updated = trip.clone();
    updated.total_expenses += expense.amount;
    updated.expenses.push(expense);
    updated
}

/// Drop the expense with `expense_id` and shrink the running total.
/// An unknown id leaves the trip unchanged.
pub fn remove_expense(trip: &Trip, expense_id: &str) -> Trip {
    let Some(removed) = trip.expenses.iter().find(|e| e.id == expense_id) else {
        return trip.clone();
    };

    let mut updated = trip.clone();
    updated.total_expenses -= removed.amount;
    updated.expenses.retain(|e| e.id != expense_id);
    updated
}
