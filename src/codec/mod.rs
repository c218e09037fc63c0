/*
 * Amount and argument codec between user input and contract calls
 *
 * Every function here is pure: amounts are scaled exactly once, on the way
 * from user input to a call argument, and never again downstream.
 */

mod amount;
mod args;
mod net_volume;

pub use amount::{decode_amount, decode_signed_amount, encode_amount};
pub use args::{
    build_mint_args, build_net_volume_query_args, build_swap_call, build_swap_params, MintArgs,
    NetVolumeQuery,
};
pub use net_volume::{decode_net_volume_result, RawNetVolume, ResultShape, TOKEN0_FIELD, TOKEN1_FIELD};
