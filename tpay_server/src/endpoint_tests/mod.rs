mod callbacks;
mod checkout;
mod helpers;
mod mocks;
