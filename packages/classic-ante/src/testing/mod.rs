
mod deposit;
mod fee;
mod tax;
