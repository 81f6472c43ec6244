use crate::Transaction;

/// User 1 spends 10, 20 and 30, user 2 spends 5 and 15, user 3 spends 50.
pub(crate) const THREE_USER_CSV: &str = "\
    transaction_id,user_id,product_id,timestamp,transaction_amount\n\
    t1,1,100,2024-01-01 09:00:00,10.0\n\
    t2,1,101,2024-01-02 09:00:00,20.0\n\
    t3,2,100,2024-01-03 09:00:00,5.0\n\
    t4,1,102,2024-01-04 09:00:00,30.0\n\
    t5,2,103,2024-01-05 09:00:00,15.0\n\
    t6,3,104,2024-01-06 09:00:00,50.0";

/// Only user 1 (amounts 1 and 3) and user 5 (amount 7).
pub(crate) const THREE_USER_CSV_REPLACEMENT: &str = "\
    transaction_id,user_id,product_id,timestamp,transaction_amount\n\
    r1,1,200,2024-02-01 09:00:00,1.0\n\
    r2,1,201,2024-02-02 09:00:00,3.0\n\
    r3,5,202,2024-02-03 09:00:00,7.0";

/// Create a transaction where only the ID, user and amount matter.
pub(crate) fn transaction(transaction_id: &str, user_id: i64, amount: f64) -> Transaction {
    Transaction {
        transaction_id: transaction_id.to_owned(),
        user_id,
        product_id: 1,
        timestamp: "2024-01-01 00:00:00".to_owned(),
        transaction_amount: amount,
    }
}
